use crate::api::ChartSpecification;
use crate::error::ChartResult;
use crate::render::Renderer;

/// Headless surface used by tests and dry runs.
///
/// It still validates the specification so tests catch inconsistent traces
/// before a real surface is attached.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub render_count: usize,
    pub last_trace_count: usize,
    pub last_specification: Option<ChartSpecification>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, specification: ChartSpecification) -> ChartResult<()> {
        specification.validate()?;
        self.render_count += 1;
        self.last_trace_count = specification.traces.len();
        self.last_specification = Some(specification);
        Ok(())
    }
}
