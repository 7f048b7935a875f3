use serde::{Deserialize, Serialize};

use crate::core::{CellValue, HexColor};
use crate::error::{ChartError, ChartResult};

use super::AxisSide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Line,
    Bar,
    Pie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Renderer-level bar arrangement. `Group` is the renderer default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarLayoutMode {
    #[default]
    Group,
    Stack,
}

/// Pie-only trace attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieTraceStyle {
    pub hole_fraction: f64,
    pub slice_colors: Vec<HexColor>,
}

/// One drawable series.
///
/// For pie traces `x_values` holds the slice labels and `y_values` the
/// summed slice values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub kind: TraceKind,
    pub name: String,
    pub x_values: Vec<CellValue>,
    pub y_values: Vec<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
    #[serde(default)]
    pub axis_side: AxisSide,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pie: Option<PieTraceStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: String,
    #[serde(default)]
    pub bar_mode: BarLayoutMode,
    #[serde(default)]
    pub secondary_axis_enabled: bool,
}

/// Fully resolved, renderer-agnostic drawing instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpecification {
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

impl ChartSpecification {
    #[must_use]
    pub fn trace_names(&self) -> Vec<&str> {
        self.traces.iter().map(|trace| trace.name.as_str()).collect()
    }

    /// Checks internal consistency before handing off to a renderer.
    pub fn validate(&self) -> ChartResult<()> {
        for trace in &self.traces {
            if trace.x_values.len() != trace.y_values.len() {
                return Err(ChartError::InvalidData(format!(
                    "trace `{}` has {} x values but {} y values",
                    trace.name,
                    trace.x_values.len(),
                    trace.y_values.len()
                )));
            }
            match (trace.kind, &trace.pie) {
                (TraceKind::Pie, Some(style)) => {
                    if style.slice_colors.len() != trace.x_values.len() {
                        return Err(ChartError::InvalidData(format!(
                            "pie trace `{}` has {} slices but {} colors",
                            trace.name,
                            trace.x_values.len(),
                            style.slice_colors.len()
                        )));
                    }
                    if !(0.0..1.0).contains(&style.hole_fraction) {
                        return Err(ChartError::InvalidData(
                            "pie hole fraction must be in [0, 1)".to_owned(),
                        ));
                    }
                }
                (TraceKind::Pie, None) => {
                    return Err(ChartError::InvalidData(format!(
                        "pie trace `{}` is missing its pie style",
                        trace.name
                    )));
                }
                (_, Some(_)) => {
                    return Err(ChartError::InvalidData(format!(
                        "non-pie trace `{}` carries a pie style",
                        trace.name
                    )));
                }
                (_, None) => {}
            }
        }
        Ok(())
    }
}
