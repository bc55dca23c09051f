//! Colors and color-scale definitions

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// 8-bit ARGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Alpha channel
    pub a: u8,
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { a: 0xFF, r, g, b }
    }

    /// Create a color with explicit alpha
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Pack as `0xAARRGGBB`
    pub const fn to_argb(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    /// Unpack from `0xAARRGGBB`
    pub const fn from_argb(value: u32) -> Self {
        let [a, r, g, b] = value.to_be_bytes();
        Self { a, r, g, b }
    }
}

impl fmt::Display for Color {
    /// Formats as `#AARRGGBB`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.to_argb())
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Parse `#AARRGGBB` (the `#` is optional, hex digits are case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 8 {
            return Err(Error::parse_error_with_context(
                "color",
                s,
                "8 hex digits in #AARRGGBB form",
            ));
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| {
            Error::parse_error_with_context("color", s, "8 hex digits in #AARRGGBB form")
        })?;
        Ok(Color::from_argb(value))
    }
}

/// One break point of a color scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Scalar value at which the color applies
    pub value: f32,
    /// Color at this value
    pub color: Color,
}

impl ColorStop {
    /// Create a stop
    pub const fn new(value: f32, color: Color) -> Self {
        Self { value, color }
    }
}

/// Color scale attached to a value dataset
///
/// Stops are kept sorted by value. Turning a scalar into a color is left to
/// the rendering side; the container only stores the definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    stops: Vec<ColorStop>,
}

impl ColorScale {
    /// Create a scale from its stops
    ///
    /// Returns an argument error for duplicate or NaN stop values.
    pub fn new(mut stops: Vec<ColorStop>) -> Result<Self> {
        if let Some(stop) = stops.iter().find(|s| s.value.is_nan()) {
            return Err(Error::InvalidArgument(format!(
                "color scale stop value must be a number (got {})",
                stop.value
            )));
        }
        stops.sort_by(|a, b| a.value.total_cmp(&b.value));
        if let Some(pair) = stops.windows(2).find(|w| w[0].value == w[1].value) {
            return Err(Error::InvalidArgument(format!(
                "duplicate color scale stop value {}",
                pair[0].value
            )));
        }
        Ok(Self { stops })
    }

    /// Stops sorted by value
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }
}
