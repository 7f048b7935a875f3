use tracing::debug;

use crate::core::Dataset;
use crate::error::{ChartError, ChartResult};

use super::{
    AxisSide, BarLayoutMode, BarMode, ChartFamily, ChartSpecification, Layout, Orientation,
    SeriesSpec, Trace, TraceKind,
};

/// Builds a horizontal bar chart: categories on Y, series values on X.
///
/// Stacking only applies with more than one series; a single series is
/// always laid out with the renderer default.
pub fn build_horizontal_bar_spec(
    dataset: &Dataset,
    title: &str,
    category_column: &str,
    series: &[SeriesSpec],
    bar_mode: Option<BarMode>,
) -> ChartResult<ChartSpecification> {
    if series.is_empty() {
        return Err(ChartError::EmptySeriesSet {
            family: ChartFamily::HorizontalBar.to_string(),
        });
    }
    let categories = &dataset.column(category_column)?.values;

    let traces = series
        .iter()
        .map(|spec| {
            Ok(Trace {
                kind: TraceKind::Bar,
                name: spec.column.clone(),
                x_values: dataset.column(&spec.column)?.values.clone(),
                y_values: categories.clone(),
                color: spec.color.clone(),
                axis_side: AxisSide::Left,
                orientation: Orientation::Horizontal,
                pie: None,
            })
        })
        .collect::<ChartResult<Vec<_>>>()?;

    let bar_mode = match bar_mode {
        Some(BarMode::Stacked) if traces.len() > 1 => BarLayoutMode::Stack,
        _ => BarLayoutMode::Group,
    };

    debug!(traces = traces.len(), ?bar_mode, "built horizontal bar chart specification");
    Ok(ChartSpecification {
        traces,
        layout: Layout {
            title: title.to_owned(),
            bar_mode,
            secondary_axis_enabled: false,
        },
    })
}
