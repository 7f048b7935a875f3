mod chart_config;
mod chart_draft;
mod chart_specification;
mod color_theme;
mod combo_spec_builder;
mod horizontal_bar_spec_builder;
mod json_contract;
mod pie_spec_builder;
pub mod series_spec;
mod spec_dispatch;

pub use chart_config::{
    BarMode, ChartConfig, ChartFamily, DONUT_HOLE_FRACTION, PIE_HOLE_FRACTION, PieOptions,
    PieStyle,
};
pub use chart_draft::ChartDraft;
pub use chart_specification::{
    BarLayoutMode, ChartSpecification, Layout, Orientation, PieTraceStyle, Trace, TraceKind,
};
pub use color_theme::ColorTheme;
pub use combo_spec_builder::build_combo_spec;
pub use horizontal_bar_spec_builder::build_horizontal_bar_spec;
pub use json_contract::{CHART_SPECIFICATION_JSON_SCHEMA_V1, ChartSpecificationJsonContractV1};
pub use pie_spec_builder::build_pie_spec;
pub use series_spec::{AxisSide, Role, SeriesSpec, VisualKind};
pub use spec_dispatch::build_chart_spec;
