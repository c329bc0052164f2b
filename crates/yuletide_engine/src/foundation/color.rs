//! Linear RGB colors authored as `#rrggbb` hex strings

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;


/// RGB color with components in `[0, 1]`
///
/// Serializes as a `#rrggbb` string so config files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

/// Errors raised while parsing a hex color
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// String is not of the form `#rrggbb`
    #[error("invalid hex color '{0}', expected #rrggbb")]
    InvalidHex(String),
}

impl Color {
    /// Pure black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Pure white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Create a color from raw components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Parse a `#rrggbb` string (the leading `#` is optional)
    pub fn parse_hex(text: &str) -> Result<Self, ColorError> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if digits.len() != 6 {
            return Err(ColorError::InvalidHex(text.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::from_hex)
            .map_err(|_| ColorError::InvalidHex(text.to_string()))
    }

    /// Format as a lowercase `#rrggbb` string
    pub fn to_hex(&self) -> String {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            quantize(self.r),
            quantize(self.g),
            quantize(self.b)
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_gold() {
        let gold = Color::parse_hex("#FFD700").unwrap();
        assert_relative_eq!(gold.r, 1.0);
        assert_relative_eq!(gold.g, 215.0 / 255.0);
        assert_relative_eq!(gold.b, 0.0);
        assert_eq!(gold.to_hex(), "#ffd700");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(Color::parse_hex("#fff").is_err());
        assert!(Color::parse_hex("#gg0000").is_err());
        assert!(Color::parse_hex("").is_err());
    }

    #[test]
    fn test_prefix_is_optional() {
        assert_eq!(Color::parse_hex("046307"), Color::parse_hex("#046307"));
    }
}
