//! Chart and loader configuration.
//!
//! Every field has a default that reproduces the stock dashboard look, so a
//! config file only needs the keys it wants to change:
//!
//! ```toml
//! [chart]
//! width = 1200
//! team_color = "#dc2626"
//!
//! [data]
//! min_year = 1901
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Opaque RGB color, (de)serialized as `#rrggbb` or one of a few CSS names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const GRAY: Rgb = Rgb(102, 102, 102);

    /// Parse `#rrggbb`, `#rgb` or a named color.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let t = s.trim().to_ascii_lowercase();
        let named = match t.as_str() {
            "black" => Some(Rgb::BLACK),
            "white" => Some(Rgb::WHITE),
            "gray" | "grey" => Some(Rgb::GRAY),
            "orange" => Some(Rgb(255, 165, 0)),
            "red" => Some(Rgb(255, 0, 0)),
            "green" => Some(Rgb(0, 128, 0)),
            "blue" => Some(Rgb(0, 0, 255)),
            "steelblue" => Some(Rgb(70, 130, 180)),
            _ => None,
        };
        if let Some(c) = named {
            return Ok(c);
        }
        let hex = t
            .strip_prefix('#')
            .ok_or_else(|| ConfigError::Color(s.to_string()))?;
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(|| ConfigError::Color(s.to_string()))?;
        match digits.as_slice() {
            [r, g, b] => Ok(Rgb(r * 17, g * 17, b * 17)),
            [r1, r0, g1, g0, b1, b0] => Ok(Rgb(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0)),
            _ => Err(ConfigError::Color(s.to_string())),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::parse(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

/// Space reserved around the plotting area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 30.0,
            right: 140.0,
            bottom: 50.0,
            left: 60.0,
        }
    }
}

/// Look and feel of the comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    pub background: Rgb,
    pub axis_color: Rgb,
    pub league_color: Rgb,
    pub team_color: Rgb,
    pub league_stroke: f32,
    pub team_stroke: f32,
    pub marker_radius: f32,
    /// Decimal places of the value shown in the hover tooltip.
    pub tooltip_precision: usize,
    pub league_label: String,
    pub team_label: String,
    /// Approximate number of ticks per axis.
    pub ticks: usize,
    pub font_px: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            margin: Margin::default(),
            background: Rgb::WHITE,
            axis_color: Rgb::BLACK,
            league_color: Rgb(0x25, 0x63, 0xeb),
            team_color: Rgb(255, 165, 0),
            league_stroke: 2.0,
            team_stroke: 2.5,
            marker_radius: 4.0,
            tooltip_precision: 3,
            league_label: "League".into(),
            team_label: "Selected Team".into(),
            ticks: 10,
            font_px: 12,
        }
    }
}

/// Row retention settings for the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Seasons before this year are dropped at load time.
    pub min_year: i32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { min_year: 1960 }
    }
}

/// Top-level configuration file: `[chart]` and `[data]` tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chart: ChartConfig,
    pub data: LoadOptions,
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = Config::from_toml_str(
            r##"
            [chart]
            width = 1200
            team_color = "#dc2626"
            [chart.margin]
            right = 180.0

            [data]
            min_year = 1901
            "##,
        )
        .unwrap();
        assert_eq!(cfg.chart.width, 1200);
        assert_eq!(cfg.chart.height, 400);
        assert_eq!(cfg.chart.team_color, Rgb(0xdc, 0x26, 0x26));
        assert_eq!(cfg.chart.league_color, Rgb(0x25, 0x63, 0xeb));
        assert_eq!(cfg.chart.margin.right, 180.0);
        assert_eq!(cfg.chart.margin.left, 60.0);
        assert_eq!(cfg.data.min_year, 1901);
    }

    #[test]
    fn colors_parse_hex_short_hex_and_names() {
        assert_eq!(Rgb::parse("#fff").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::parse("Orange").unwrap(), Rgb(255, 165, 0));
        assert_eq!(Rgb::parse("#2563EB").unwrap().to_string(), "#2563eb");
        assert!(Rgb::parse("2563eb").is_err());
        assert!(Rgb::parse("#12345").is_err());
        assert!(Config::from_toml_str("[chart]\nleague_color = \"teal-ish\"").is_err());
    }
}
