use tracing::trace;

use crate::core::{Dataset, DatasetSchema, HexColor};
use crate::error::{ChartError, ChartResult, ValidationError};

use super::{
    AxisSide, BarMode, ChartConfig, ChartFamily, ChartSpecification, PieOptions, SeriesSpec,
    VisualKind, build_chart_spec, series_spec,
};

const DEFAULT_SERIES_COLOR: &str = "#000000";

/// Chart configuration assembled one edit at a time.
///
/// Every edit is validated against the dataset schema and consumes the
/// draft. Clone before an edit to keep the previous state on rejection.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDraft {
    schema: DatasetSchema,
    family: ChartFamily,
    title: String,
    x_axis_column: Option<String>,
    series: Vec<SeriesSpec>,
    bar_mode: Option<BarMode>,
    pie_options: Option<PieOptions>,
}

impl ChartDraft {
    #[must_use]
    pub fn new(schema: DatasetSchema, family: ChartFamily) -> Self {
        Self {
            schema,
            family,
            title: String::new(),
            x_axis_column: None,
            series: Vec::new(),
            bar_mode: None,
            pie_options: None,
        }
    }

    /// Starts a draft for `dataset`.
    #[must_use]
    pub fn for_dataset(dataset: &Dataset, family: ChartFamily) -> Self {
        Self::new(dataset.schema(), family)
    }

    #[must_use]
    pub fn family(&self) -> ChartFamily {
        self.family
    }

    #[must_use]
    pub fn series(&self) -> &[SeriesSpec] {
        &self.series
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_x_axis(mut self, column: impl Into<String>) -> ChartResult<Self> {
        let column = column.into();
        self.ensure_series_family()?;
        if !self.schema.contains(&column) {
            return Err(ChartError::ColumnNotFound { column });
        }
        self.x_axis_column = Some(column);
        Ok(self)
    }

    pub fn add_series(mut self, series: SeriesSpec) -> ChartResult<Self> {
        self.ensure_series_family()?;
        self.check_series(&series)?;
        trace!(column = %series.column, index = self.series.len(), "draft series added");
        self.series.push(series);
        Ok(self)
    }

    /// Adds a series on `column` with the form defaults: black, left axis,
    /// drawn as a line (combo) or bar (horizontal).
    pub fn add_default_series(self, column: impl Into<String>) -> ChartResult<Self> {
        let color = HexColor::parse(DEFAULT_SERIES_COLOR)?;
        let series = match self.family {
            ChartFamily::HorizontalBar => SeriesSpec::bar(column),
            ChartFamily::LineBarCombo | ChartFamily::PieDonut => {
                SeriesSpec::line(column).with_axis_side(AxisSide::Left)
            }
        };
        self.add_series(series.with_color(color))
    }

    pub fn update_series(mut self, index: usize, series: SeriesSpec) -> ChartResult<Self> {
        let len = self.series.len();
        if index >= len {
            return Err(ValidationError::SeriesIndexOutOfRange { index, len }.into());
        }
        self.check_series(&series)?;
        self.series[index] = series;
        Ok(self)
    }

    pub fn remove_series(mut self, index: usize) -> ChartResult<Self> {
        let len = self.series.len();
        if index >= len {
            return Err(ValidationError::SeriesIndexOutOfRange { index, len }.into());
        }
        self.series.remove(index);
        Ok(self)
    }

    #[must_use]
    pub fn with_bar_mode(mut self, bar_mode: BarMode) -> Self {
        self.bar_mode = Some(bar_mode);
        self
    }

    pub fn with_pie_options(mut self, options: PieOptions) -> ChartResult<Self> {
        if self.family != ChartFamily::PieDonut {
            return Err(ValidationError::ConflictingOptions {
                family: self.family.to_string(),
                group: "pie".to_owned(),
            }
            .into());
        }
        if !options.has_label_value_pair() {
            return Err(ChartError::EmptySeriesSet {
                family: self.family.to_string(),
            });
        }
        options.validate(&self.schema).map_err(|err| match err {
            ValidationError::UnknownColumn { column } => ChartError::ColumnNotFound { column },
            other => other.into(),
        })?;
        self.pie_options = Some(options);
        Ok(self)
    }

    /// Whether a stacked/grouped choice changes anything for this draft.
    #[must_use]
    pub fn bar_mode_applicable(&self) -> bool {
        match self.family {
            ChartFamily::LineBarCombo => self
                .series
                .iter()
                .any(|series| series.resolved_visual_kind() == VisualKind::Bar),
            ChartFamily::HorizontalBar => self.series.len() > 1,
            ChartFamily::PieDonut => false,
        }
    }

    /// Freezes the draft into a validated `ChartConfig`.
    pub fn finish(&self) -> ChartResult<ChartConfig> {
        let config = ChartConfig {
            chart_family: self.family,
            title: self.title.clone(),
            x_axis_column: self.x_axis_column.clone(),
            series: self.series.clone(),
            bar_mode: self.bar_mode.filter(|_| self.bar_mode_applicable()),
            pie_options: self.pie_options.clone(),
        };
        config.validate(&self.schema)?;
        Ok(config)
    }

    /// Builds the chart for the current draft.
    pub fn preview(&self, dataset: &Dataset) -> ChartResult<ChartSpecification> {
        build_chart_spec(dataset, &self.finish()?)
    }

    /// Discards every edit, keeping the dataset schema and family.
    #[must_use]
    pub fn reset(self) -> Self {
        Self::new(self.schema, self.family)
    }

    fn ensure_series_family(&self) -> ChartResult<()> {
        if self.family.requires_series() {
            Ok(())
        } else {
            Err(ValidationError::ConflictingOptions {
                family: self.family.to_string(),
                group: "series".to_owned(),
            }
            .into())
        }
    }

    fn check_series(&self, series: &SeriesSpec) -> ChartResult<()> {
        series_spec::validate(series, &self.schema, self.family).map_err(|err| match err {
            ValidationError::UnknownColumn { column } => ChartError::ColumnNotFound { column },
            other => other.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CellValue, Column};

    fn dataset() -> Dataset {
        Dataset::new(
            "sales",
            vec![
                Column::new(
                    "month",
                    vec![CellValue::Text("jan".to_owned()), CellValue::Text("feb".to_owned())],
                ),
                Column::new("units", vec![CellValue::Number(3.0), CellValue::Number(4.0)]),
                Column::new("revenue", vec![CellValue::Number(30.0), CellValue::Number(44.0)]),
            ],
        )
        .expect("dataset")
    }

    #[test]
    fn default_series_use_form_defaults() {
        let draft = ChartDraft::for_dataset(&dataset(), ChartFamily::LineBarCombo)
            .add_default_series("units")
            .expect("series");
        let series = &draft.series()[0];
        assert_eq!(series.visual_kind, Some(VisualKind::Line));
        assert_eq!(series.axis_side, Some(AxisSide::Left));
        assert_eq!(series.color.as_ref().map(HexColor::as_str), Some("#000000"));
    }

    #[test]
    fn bar_mode_is_dropped_when_not_applicable() {
        let config = ChartDraft::for_dataset(&dataset(), ChartFamily::HorizontalBar)
            .with_x_axis("month")
            .and_then(|draft| draft.add_series(SeriesSpec::bar("units")))
            .map(|draft| draft.with_bar_mode(BarMode::Stacked))
            .and_then(|draft| draft.finish())
            .expect("config");
        assert_eq!(config.bar_mode, None);
    }

    #[test]
    fn pie_drafts_reject_series() {
        let err = ChartDraft::for_dataset(&dataset(), ChartFamily::PieDonut)
            .add_series(SeriesSpec::new("units"))
            .expect_err("pie has no series");
        assert!(matches!(
            err,
            ChartError::Validation(ValidationError::ConflictingOptions { .. })
        ));
    }
}
