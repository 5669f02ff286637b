//! Inline style markers for annotation lines and highlighted captions.
//!
//! Markers are ASS override tags, which is the format annotated subtitles
//! are written in:
//!
//! ```text
//! bold:  {\b1}text{\b0}
//! color: {\c&HBBGGRR&}text{\c}
//! ```
//!
//! # Examples
//!
//! ```
//! use subgloss::annotation::style::{Color, TextStyle};
//!
//! let color: Color = "#FF8000".parse().unwrap();
//! assert_eq!(TextStyle::Color(color).apply("猫"), r"{\c&H0080FF&}猫{\c}");
//! assert_eq!(TextStyle::Bold.apply("①"), r"{\b1}①{\b0}");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SubglossError};

/// An RGB highlight color, written `#RRGGBB` in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// ASS color literal (blue, green, red order).
    pub fn to_ass(self) -> String {
        format!("&H{:02X}{:02X}{:02X}&", self.b, self.g, self.r)
    }
}

impl FromStr for Color {
    type Err = SubglossError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| {
                SubglossError::configuration(format!("Invalid color '{s}', expected #RRGGBB"))
            })?;

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| SubglossError::configuration(format!("Invalid color '{s}': {e}")))
        };

        Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A style that can be wrapped around a piece of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    Bold,
    Color(Color),
}

impl TextStyle {
    /// Wrap `text` in this style's markers.
    pub fn apply(self, text: &str) -> String {
        match self {
            TextStyle::Bold => format!("{{\\b1}}{text}{{\\b0}}"),
            TextStyle::Color(color) => format!("{{\\c{}}}{text}{{\\c}}", color.to_ass()),
        }
    }
}
