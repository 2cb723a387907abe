//! Palette colours, stored as 8-bit RGB and persisted as `#rrggbb` strings.

use std::{fmt, str::FromStr};

use image::Rgba;
use serde::{Deserialize, Serialize};

/// Opaque RGB colour used for colour-dot decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RgbColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Fully opaque RGBA pixel for drawing onto the working canvas.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.red, self.green, self.blue, 255])
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl FromStr for RgbColor {
    type Err = String;

    /// Accepts `#rrggbb`, `rrggbb` and the short `#rgb` form.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid colour '{value}'; expected hex digits"));
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(format!("invalid colour '{value}'; expected #rrggbb")),
        };
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16)
                .map_err(|_| format!("invalid colour '{value}'; expected hex digits"))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for RgbColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        color.to_string()
    }
}

/// Default colour-dot palette: saturated primaries plus a few earth tones.
pub fn default_palette() -> Vec<RgbColor> {
    vec![
        RgbColor::new(0xd6, 0x28, 0x28),
        RgbColor::new(0xf7, 0x7f, 0x00),
        RgbColor::new(0xfc, 0xbf, 0x49),
        RgbColor::new(0x2a, 0x9d, 0x8f),
        RgbColor::new(0x26, 0x46, 0x53),
        RgbColor::new(0x1d, 0x35, 0x57),
        RgbColor::new(0x6a, 0x4c, 0x93),
        RgbColor::new(0x00, 0x00, 0x00),
    ]
}
