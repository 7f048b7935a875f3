use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

use super::{
    AxisSide, BarMode, ChartConfig, ChartFamily, ChartSpecification, ColorTheme, PieOptions,
    PieStyle, SeriesSpec, VisualKind,
};
use crate::core::HexColor;

pub const CHART_SPECIFICATION_JSON_SCHEMA_V1: u32 = 1;

const LEGACY_COMBO_TYPE: &str = "Line / Vertical Bars / Stacked Vertical Bars / Combination";
const LEGACY_HORIZONTAL_TYPE: &str = "Horizontal Bars / Stacked Horizontal Bars";
const LEGACY_PIE_TYPE: &str = "Donut / Pie";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpecificationJsonContractV1 {
    pub schema_version: u32,
    pub specification: ChartSpecification,
}

impl ChartSpecification {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSpecificationJsonContractV1 {
            schema_version: CHART_SPECIFICATION_JSON_SCHEMA_V1,
            specification: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart specification v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(specification) = serde_json::from_str::<ChartSpecification>(input) {
            return Ok(specification);
        }
        let payload: ChartSpecificationJsonContractV1 =
            serde_json::from_str(input).map_err(|e| {
                ChartError::InvalidData(format!("failed to parse chart specification json: {e}"))
            })?;
        if payload.schema_version != CHART_SPECIFICATION_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported chart specification schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.specification)
    }
}

/// Series entry as written by the legacy form producer.
#[derive(Debug, Clone, Deserialize)]
struct LegacySeries {
    column: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    axis: Option<String>,
    color: Option<String>,
}

/// Flat configuration document written by the legacy form producer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyChartConfig {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    title: Option<String>,
    x_axis: Option<String>,
    bar_type: Option<String>,
    #[serde(default)]
    series: Vec<LegacySeries>,
    labels: Option<String>,
    values: Option<String>,
    chart_type: Option<String>,
    largest_items: Option<u32>,
    color_theme: Option<String>,
}

impl ChartConfig {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart config: {e}"))
        })
    }

    /// Parses the current camelCase shape, falling back to the legacy
    /// producer shape (`type`, `xAxis`, `barType`, `largestItems`, ...).
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart config json: {e}")))?;
        Self::from_json_compat_value(value)
    }

    pub fn from_json_compat_value(value: serde_json::Value) -> ChartResult<Self> {
        if value.get("chartFamily").is_some() {
            return serde_json::from_value(value).map_err(|e| {
                ChartError::InvalidData(format!("failed to parse chart config: {e}"))
            });
        }
        let legacy: LegacyChartConfig = serde_json::from_value(value).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse legacy chart config: {e}"))
        })?;
        legacy.into_config()
    }
}

impl LegacyChartConfig {
    fn into_config(self) -> ChartResult<ChartConfig> {
        let title = self.title.unwrap_or_default();
        match self.kind.as_str() {
            LEGACY_COMBO_TYPE | LEGACY_HORIZONTAL_TYPE => {
                let family = if self.kind == LEGACY_COMBO_TYPE {
                    ChartFamily::LineBarCombo
                } else {
                    ChartFamily::HorizontalBar
                };
                let series = self
                    .series
                    .into_iter()
                    .map(|entry| entry.into_series(family))
                    .collect::<ChartResult<Vec<_>>>()?;
                let bar_mode = self.bar_type.as_deref().map(legacy_bar_mode).transpose()?;
                Ok(ChartConfig {
                    chart_family: family,
                    title,
                    x_axis_column: self.x_axis,
                    series,
                    bar_mode,
                    pie_options: None,
                })
            }
            LEGACY_PIE_TYPE => {
                let style = match self.chart_type.as_deref() {
                    Some("Pie") => PieStyle::Pie,
                    Some("Donut") | None => PieStyle::Donut,
                    Some(other) => {
                        return Err(ChartError::InvalidData(format!(
                            "unknown legacy pie chart type `{other}`"
                        )));
                    }
                };
                let color_theme = self
                    .color_theme
                    .as_deref()
                    .map(ColorTheme::parse)
                    .transpose()?
                    .unwrap_or_default();
                let mut options = PieOptions::new(
                    self.labels.unwrap_or_default(),
                    self.values.unwrap_or_default(),
                    style,
                )
                .with_color_theme(color_theme);
                options.top_n = self.largest_items;
                Ok(ChartConfig::pie(title, options))
            }
            other => Err(ChartError::InvalidData(format!(
                "unknown legacy visualization type `{other}`"
            ))),
        }
    }
}

impl LegacySeries {
    fn into_series(self, family: ChartFamily) -> ChartResult<SeriesSpec> {
        let column = self
            .column
            .ok_or_else(|| ChartError::InvalidData("legacy series has no column".to_owned()))?;
        let mut series = SeriesSpec::new(column);
        if family == ChartFamily::LineBarCombo {
            series.visual_kind = Some(match self.kind.as_deref() {
                Some("Bar") => VisualKind::Bar,
                Some("Line") | None => VisualKind::Line,
                Some(other) => {
                    return Err(ChartError::InvalidData(format!(
                        "unknown legacy series type `{other}`"
                    )));
                }
            });
            series.axis_side = Some(match self.axis.as_deref() {
                Some("Right") => AxisSide::Right,
                Some("Left") | None => AxisSide::Left,
                Some(other) => {
                    return Err(ChartError::InvalidData(format!(
                        "unknown legacy axis `{other}`"
                    )));
                }
            });
        }
        if let Some(color) = self.color.filter(|color| !color.trim().is_empty()) {
            series.color = Some(HexColor::parse(&color)?);
        }
        Ok(series)
    }
}

fn legacy_bar_mode(value: &str) -> ChartResult<BarMode> {
    match value {
        "Stacked Bars" => Ok(BarMode::Stacked),
        "Side-by-Side Bars" => Ok(BarMode::Grouped),
        other => Err(ChartError::InvalidData(format!(
            "unknown legacy bar type `{other}`"
        ))),
    }
}
