//! chart-session: declarative chart configurations and their sessions.
//!
//! A small serializable `ChartConfig` plus a tabular `Dataset` become a
//! renderer-agnostic `ChartSpecification`. Sessions coordinate where that
//! configuration comes from, including preview sessions whose configuration
//! is published asynchronously and must be polled for.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod session;
pub mod telemetry;

pub use api::{ChartConfig, ChartSpecification, build_chart_spec};
pub use error::{ChartError, ChartResult, SessionError, SessionResult};
