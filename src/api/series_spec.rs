use serde::{Deserialize, Serialize};

use crate::core::{DatasetSchema, HexColor};
use crate::error::ValidationError;

use super::ChartFamily;

/// Whether a series is the independent (category) or dependent (value) one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Category,
    #[default]
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisSide {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisualKind {
    #[default]
    Line,
    Bar,
}

/// One data series of a line/bar or horizontal-bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSpec {
    pub column: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_side: Option<AxisSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_kind: Option<VisualKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
}

impl SeriesSpec {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            role: Role::Value,
            axis_side: None,
            visual_kind: None,
            color: None,
        }
    }

    #[must_use]
    pub fn line(column: impl Into<String>) -> Self {
        Self::new(column).with_visual_kind(VisualKind::Line)
    }

    #[must_use]
    pub fn bar(column: impl Into<String>) -> Self {
        Self::new(column).with_visual_kind(VisualKind::Bar)
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn with_axis_side(mut self, side: AxisSide) -> Self {
        self.axis_side = Some(side);
        self
    }

    #[must_use]
    pub fn with_visual_kind(mut self, kind: VisualKind) -> Self {
        self.visual_kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: HexColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Parses and sets a `#RRGGBB` color.
    pub fn with_color_hex(self, color: &str) -> Result<Self, ValidationError> {
        Ok(self.with_color(HexColor::parse(color)?))
    }

    #[must_use]
    pub fn resolved_axis_side(&self) -> AxisSide {
        self.axis_side.unwrap_or_default()
    }

    #[must_use]
    pub fn resolved_visual_kind(&self) -> VisualKind {
        self.visual_kind.unwrap_or_default()
    }
}

/// Checks one series against the dataset schema and the target chart family.
///
/// Color syntax is already enforced by `HexColor`; this covers column
/// existence and role/axis/visual compatibility.
pub fn validate(
    series: &SeriesSpec,
    schema: &DatasetSchema,
    family: ChartFamily,
) -> Result<(), ValidationError> {
    if !schema.contains(&series.column) {
        return Err(ValidationError::UnknownColumn {
            column: series.column.clone(),
        });
    }
    if series.role != Role::Value {
        return Err(ValidationError::RoleMismatch {
            column: series.column.clone(),
            role: "category".to_owned(),
        });
    }

    match family {
        ChartFamily::LineBarCombo => Ok(()),
        ChartFamily::HorizontalBar => {
            if series.axis_side == Some(AxisSide::Right) {
                return Err(ValidationError::AxisSideNotSupported {
                    column: series.column.clone(),
                    family: family.to_string(),
                });
            }
            if series.visual_kind == Some(VisualKind::Line) {
                return Err(ValidationError::VisualKindNotSupported {
                    column: series.column.clone(),
                    kind: "line".to_owned(),
                    family: family.to_string(),
                });
            }
            Ok(())
        }
        ChartFamily::PieDonut => Err(ValidationError::ConflictingOptions {
            family: family.to_string(),
            group: "series".to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CellValue, Column, Dataset};

    fn schema() -> DatasetSchema {
        Dataset::new(
            "s",
            vec![
                Column::new("month", vec![CellValue::Text("jan".to_owned())]),
                Column::new("revenue", vec![CellValue::Number(1.0)]),
            ],
        )
        .expect("dataset")
        .schema()
    }

    #[test]
    fn right_axis_is_only_valid_for_combo_charts() {
        let series = SeriesSpec::bar("revenue").with_axis_side(AxisSide::Right);
        assert!(validate(&series, &schema(), ChartFamily::LineBarCombo).is_ok());
        assert!(matches!(
            validate(&series, &schema(), ChartFamily::HorizontalBar),
            Err(ValidationError::AxisSideNotSupported { .. })
        ));
    }

    #[test]
    fn category_role_is_rejected_as_series() {
        let series = SeriesSpec::line("month").with_role(Role::Category);
        assert!(matches!(
            validate(&series, &schema(), ChartFamily::LineBarCombo),
            Err(ValidationError::RoleMismatch { .. })
        ));
    }

    #[test]
    fn bad_hex_color_is_rejected() {
        let err = SeriesSpec::line("revenue")
            .with_color_hex("#12345")
            .expect_err("too short");
        assert!(matches!(err, ValidationError::InvalidColor { .. }));
    }
}
