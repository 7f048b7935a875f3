use crate::core::Dataset;
use crate::error::{ChartResult, ValidationError};

use super::{
    ChartConfig, ChartFamily, ChartSpecification, build_combo_spec, build_horizontal_bar_spec,
    build_pie_spec,
};

/// Validates `config` against `dataset` and routes it to the builder of its
/// chart family.
pub fn build_chart_spec(dataset: &Dataset, config: &ChartConfig) -> ChartResult<ChartSpecification> {
    config.validate(&dataset.schema())?;
    let family = config.chart_family;
    match family {
        ChartFamily::LineBarCombo | ChartFamily::HorizontalBar => {
            let x_axis = config
                .x_axis_column
                .as_deref()
                .ok_or_else(|| ValidationError::MissingXAxis {
                    family: family.to_string(),
                })?;
            if family == ChartFamily::LineBarCombo {
                build_combo_spec(dataset, &config.title, x_axis, &config.series, config.bar_mode)
            } else {
                build_horizontal_bar_spec(
                    dataset,
                    &config.title,
                    x_axis,
                    &config.series,
                    config.bar_mode,
                )
            }
        }
        ChartFamily::PieDonut => {
            let options = config
                .pie_options
                .as_ref()
                .ok_or_else(|| ValidationError::MissingOptions {
                    family: family.to_string(),
                    group: "pie".to_owned(),
                })?;
            build_pie_spec(dataset, &config.title, options)
        }
    }
}
