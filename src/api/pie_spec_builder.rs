use tracing::{debug, warn};

use crate::core::primitives::{coerce_decimal, decimal_to_f64};
use crate::core::{CellValue, Dataset, aggregate_pie_groups, select_top_groups};
use crate::error::{ChartError, ChartResult, ValidationError};

use super::{
    AxisSide, BarLayoutMode, ChartFamily, ChartSpecification, Layout, Orientation, PieOptions,
    PieTraceStyle, Trace, TraceKind,
};

/// Builds a pie or donut chart by summing `values_column` per label.
///
/// Groups keep first-encountered order. With `top_n`, only the largest
/// groups survive, largest first; no remainder slice is synthesized.
pub fn build_pie_spec(
    dataset: &Dataset,
    title: &str,
    options: &PieOptions,
) -> ChartResult<ChartSpecification> {
    if !options.has_label_value_pair() {
        return Err(ChartError::EmptySeriesSet {
            family: ChartFamily::PieDonut.to_string(),
        });
    }
    let labels = &dataset.column(&options.labels_column)?.values;
    let values = &dataset.column(&options.values_column)?.values;
    if options.labels_column == options.values_column {
        return Err(ValidationError::SameLabelsAndValues {
            column: options.labels_column.clone(),
        }
        .into());
    }
    let style = options.style().ok_or_else(|| ValidationError::InvalidHoleFraction {
        value: options.hole_fraction.to_string(),
    })?;
    if options.top_n == Some(0) {
        return Err(ValidationError::ZeroTopN.into());
    }
    if dataset.row_count() > 0 && !values.iter().any(|value| coerce_decimal(value).is_some()) {
        return Err(ChartError::InvalidAggregationTarget {
            column: options.values_column.clone(),
        });
    }

    let aggregation = aggregate_pie_groups(labels, values);
    if aggregation.dropped_rows > 0 {
        warn!(
            column = %options.values_column,
            dropped_rows = aggregation.dropped_rows,
            overflowed_rows = aggregation.overflowed_rows,
            "dropping non-numeric or overflowing rows from pie aggregation"
        );
    }
    let group_count = aggregation.groups.len();
    let groups = match options.top_n {
        Some(top_n) => select_top_groups(aggregation.groups, top_n as usize),
        None => aggregation.groups,
    };

    let mut x_values = Vec::with_capacity(groups.len());
    let mut y_values = Vec::with_capacity(groups.len());
    for group in groups {
        y_values.push(CellValue::Number(decimal_to_f64(
            group.total,
            &options.values_column,
        )?));
        x_values.push(group.label);
    }

    debug!(
        groups = group_count,
        slices = x_values.len(),
        ?style,
        theme = %options.color_theme,
        "built pie chart specification"
    );
    Ok(ChartSpecification {
        traces: vec![Trace {
            kind: TraceKind::Pie,
            name: options.values_column.clone(),
            pie: Some(PieTraceStyle {
                hole_fraction: style.hole_fraction(),
                slice_colors: options.color_theme.slice_colors(x_values.len()),
            }),
            x_values,
            y_values,
            color: None,
            axis_side: AxisSide::Left,
            orientation: Orientation::Vertical,
        }],
        layout: Layout {
            title: title.to_owned(),
            bar_mode: BarLayoutMode::Group,
            secondary_axis_enabled: false,
        },
    })
}
