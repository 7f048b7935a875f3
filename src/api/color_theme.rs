use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::HexColor;
use crate::error::ChartError;

const BLUE_GREY: [&str; 6] = ["#1F4E79", "#2E75B6", "#9DC3E6", "#596A7A", "#8497B0", "#D6DCE4"];
const YELLOW_GREEN: [&str; 6] = ["#BF9000", "#FFD966", "#C9E265", "#70AD47", "#548235", "#A9D18E"];
const RED_ORANGE: [&str; 6] = ["#C00000", "#FF5050", "#ED7D31", "#F4B183", "#FFC000", "#843C0C"];

/// Closed set of pie/donut palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColorTheme {
    #[default]
    BlueGrey,
    YellowGreen,
    RedOrange,
}

impl ColorTheme {
    pub const ALL: [Self; 3] = [Self::BlueGrey, Self::YellowGreen, Self::RedOrange];

    /// Accepts `BlueGrey` as well as the display form `Blue-Grey`.
    pub fn parse(name: &str) -> Result<Self, ChartError> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "bluegrey" => Ok(Self::BlueGrey),
            "yellowgreen" => Ok(Self::YellowGreen),
            "redorange" => Ok(Self::RedOrange),
            _ => Err(ChartError::UnknownColorTheme {
                name: name.to_owned(),
            }),
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::BlueGrey => "Blue-Grey",
            Self::YellowGreen => "Yellow-Green",
            Self::RedOrange => "Red-Orange",
        }
    }

    #[must_use]
    pub fn palette(self) -> Vec<HexColor> {
        let raw = match self {
            Self::BlueGrey => BLUE_GREY,
            Self::YellowGreen => YELLOW_GREEN,
            Self::RedOrange => RED_ORANGE,
        };
        raw.iter()
            .filter_map(|hex| HexColor::parse(hex).ok())
            .collect()
    }

    /// Palette colors assigned cyclically to `count` slices.
    #[must_use]
    pub fn slice_colors(self, count: usize) -> Vec<HexColor> {
        let palette = self.palette();
        palette.iter().cycle().take(count).cloned().collect()
    }
}

impl FromStr for ColorTheme {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ColorTheme {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ColorTheme> for String {
    fn from(theme: ColorTheme) -> Self {
        theme.display_name().to_owned()
    }
}

impl fmt::Display for ColorTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
