use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::DatasetSchema;
use crate::error::{ChartError, ChartResult, ValidationError};

use super::{ColorTheme, SeriesSpec, series_spec};

pub const DONUT_HOLE_FRACTION: f64 = 0.4;
pub const PIE_HOLE_FRACTION: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartFamily {
    LineBarCombo,
    HorizontalBar,
    PieDonut,
}

impl ChartFamily {
    #[must_use]
    pub fn requires_series(self) -> bool {
        !matches!(self, Self::PieDonut)
    }
}

impl fmt::Display for ChartFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LineBarCombo => "line/bar combination",
            Self::HorizontalBar => "horizontal bar",
            Self::PieDonut => "pie/donut",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BarMode {
    Stacked,
    #[default]
    Grouped,
}

/// Pie or donut; the hole fraction is the only difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieStyle {
    Pie,
    Donut,
}

impl PieStyle {
    #[must_use]
    pub fn hole_fraction(self) -> f64 {
        match self {
            Self::Pie => PIE_HOLE_FRACTION,
            Self::Donut => DONUT_HOLE_FRACTION,
        }
    }

    #[must_use]
    pub fn from_hole_fraction(hole_fraction: f64) -> Option<Self> {
        if hole_fraction == PIE_HOLE_FRACTION {
            Some(Self::Pie)
        } else if hole_fraction == DONUT_HOLE_FRACTION {
            Some(Self::Donut)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieOptions {
    pub labels_column: String,
    pub values_column: String,
    pub hole_fraction: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<u32>,
    pub color_theme: ColorTheme,
}

impl PieOptions {
    #[must_use]
    pub fn new(labels_column: impl Into<String>, values_column: impl Into<String>, style: PieStyle) -> Self {
        Self {
            labels_column: labels_column.into(),
            values_column: values_column.into(),
            hole_fraction: style.hole_fraction(),
            top_n: None,
            color_theme: ColorTheme::default(),
        }
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: u32) -> Self {
        self.top_n = Some(top_n);
        self
    }

    #[must_use]
    pub fn with_color_theme(mut self, theme: ColorTheme) -> Self {
        self.color_theme = theme;
        self
    }

    /// Whether both the labels and the values column are named.
    #[must_use]
    pub fn has_label_value_pair(&self) -> bool {
        !self.labels_column.trim().is_empty() && !self.values_column.trim().is_empty()
    }

    /// Returns `None` if the hole fraction is neither 0 nor 0.4.
    #[must_use]
    pub fn style(&self) -> Option<PieStyle> {
        PieStyle::from_hole_fraction(self.hole_fraction)
    }

    pub fn validate(&self, schema: &DatasetSchema) -> Result<(), ValidationError> {
        for column in [&self.labels_column, &self.values_column] {
            if !schema.contains(column) {
                return Err(ValidationError::UnknownColumn {
                    column: column.clone(),
                });
            }
        }
        if self.labels_column == self.values_column {
            return Err(ValidationError::SameLabelsAndValues {
                column: self.labels_column.clone(),
            });
        }
        if self.style().is_none() {
            return Err(ValidationError::InvalidHoleFraction {
                value: self.hole_fraction.to_string(),
            });
        }
        if self.top_n == Some(0) {
            return Err(ValidationError::ZeroTopN);
        }
        Ok(())
    }
}

/// Declarative, serializable chart request.
///
/// Exactly one family option group is populated: `x_axis_column` + `series`
/// (+ optional `bar_mode`) for the bar/line families, `pie_options` for
/// pie/donut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub chart_family: ChartFamily,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis_column: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<SeriesSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_mode: Option<BarMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pie_options: Option<PieOptions>,
}

impl ChartConfig {
    #[must_use]
    pub fn combo(
        title: impl Into<String>,
        x_axis_column: impl Into<String>,
        series: Vec<SeriesSpec>,
    ) -> Self {
        Self {
            chart_family: ChartFamily::LineBarCombo,
            title: title.into(),
            x_axis_column: Some(x_axis_column.into()),
            series,
            bar_mode: None,
            pie_options: None,
        }
    }

    #[must_use]
    pub fn horizontal_bar(
        title: impl Into<String>,
        category_column: impl Into<String>,
        series: Vec<SeriesSpec>,
    ) -> Self {
        Self {
            chart_family: ChartFamily::HorizontalBar,
            ..Self::combo(title, category_column, series)
        }
    }

    #[must_use]
    pub fn pie(title: impl Into<String>, options: PieOptions) -> Self {
        Self {
            chart_family: ChartFamily::PieDonut,
            title: title.into(),
            x_axis_column: None,
            series: Vec::new(),
            bar_mode: None,
            pie_options: Some(options),
        }
    }

    #[must_use]
    pub fn with_bar_mode(mut self, bar_mode: BarMode) -> Self {
        self.bar_mode = Some(bar_mode);
        self
    }

    /// Full shape check against a dataset schema.
    pub fn validate(&self, schema: &DatasetSchema) -> ChartResult<()> {
        let family = self.chart_family;
        match family {
            ChartFamily::LineBarCombo | ChartFamily::HorizontalBar => {
                if self.pie_options.is_some() {
                    return Err(ValidationError::ConflictingOptions {
                        family: family.to_string(),
                        group: "pie".to_owned(),
                    }
                    .into());
                }
                let x_axis = self.x_axis_column.as_deref().ok_or_else(|| {
                    ValidationError::MissingXAxis {
                        family: family.to_string(),
                    }
                })?;
                if !schema.contains(x_axis) {
                    return Err(ChartError::ColumnNotFound {
                        column: x_axis.to_owned(),
                    });
                }
                if self.series.is_empty() {
                    return Err(ChartError::EmptySeriesSet {
                        family: family.to_string(),
                    });
                }
                for series in &self.series {
                    series_spec::validate(series, schema, family).map_err(column_aware)?;
                }
                Ok(())
            }
            ChartFamily::PieDonut => {
                if self.x_axis_column.is_some() || !self.series.is_empty() || self.bar_mode.is_some() {
                    return Err(ValidationError::ConflictingOptions {
                        family: family.to_string(),
                        group: "series".to_owned(),
                    }
                    .into());
                }
                let options = self.pie_options.as_ref().ok_or_else(|| {
                    ValidationError::MissingOptions {
                        family: family.to_string(),
                        group: "pie".to_owned(),
                    }
                })?;
                if !options.has_label_value_pair() {
                    return Err(ChartError::EmptySeriesSet {
                        family: family.to_string(),
                    });
                }
                options.validate(schema).map_err(column_aware)
            }
        }
    }
}

/// Missing columns surface as `ColumnNotFound`, matching the builders.
fn column_aware(err: ValidationError) -> ChartError {
    match err {
        ValidationError::UnknownColumn { column } => ChartError::ColumnNotFound { column },
        other => ChartError::Validation(other),
    }
}
