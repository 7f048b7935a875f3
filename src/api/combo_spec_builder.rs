use tracing::debug;

use crate::core::Dataset;
use crate::error::{ChartError, ChartResult};

use super::{
    AxisSide, BarLayoutMode, BarMode, ChartFamily, ChartSpecification, Layout, Orientation,
    SeriesSpec, Trace, TraceKind, VisualKind,
};

/// Builds a line/bar combination chart.
///
/// One trace per series, in series order (which is also stacking and legend
/// order). The secondary axis is enabled iff some series sits on the right.
pub fn build_combo_spec(
    dataset: &Dataset,
    title: &str,
    x_axis_column: &str,
    series: &[SeriesSpec],
    bar_mode: Option<BarMode>,
) -> ChartResult<ChartSpecification> {
    if series.is_empty() {
        return Err(ChartError::EmptySeriesSet {
            family: ChartFamily::LineBarCombo.to_string(),
        });
    }
    let x_values = &dataset.column(x_axis_column)?.values;

    let traces = series
        .iter()
        .map(|spec| {
            let y_values = dataset.column(&spec.column)?.values.clone();
            let kind = match spec.resolved_visual_kind() {
                VisualKind::Line => TraceKind::Line,
                VisualKind::Bar => TraceKind::Bar,
            };
            Ok(Trace {
                kind,
                name: spec.column.clone(),
                x_values: x_values.clone(),
                y_values,
                color: spec.color.clone(),
                axis_side: spec.resolved_axis_side(),
                orientation: Orientation::Vertical,
                pie: None,
            })
        })
        .collect::<ChartResult<Vec<_>>>()?;

    let secondary_axis_enabled = traces
        .iter()
        .any(|trace| trace.axis_side == AxisSide::Right);
    let bar_mode = match bar_mode {
        Some(BarMode::Stacked) => BarLayoutMode::Stack,
        Some(BarMode::Grouped) | None => BarLayoutMode::Group,
    };

    debug!(
        traces = traces.len(),
        secondary_axis_enabled,
        ?bar_mode,
        "built combo chart specification"
    );
    Ok(ChartSpecification {
        traces,
        layout: Layout {
            title: title.to_owned(),
            bar_mode,
            secondary_axis_enabled,
        },
    })
}
