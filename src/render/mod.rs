mod null_renderer;

pub use null_renderer::NullRenderer;

use crate::api::ChartSpecification;
use crate::error::ChartResult;

/// Contract implemented by any chart-drawing surface.
///
/// A surface receives a fully resolved `ChartSpecification` and owns it from
/// then on; each specification is handed over exactly once.
pub trait Renderer {
    fn render(&mut self, specification: ChartSpecification) -> ChartResult<()>;
}
