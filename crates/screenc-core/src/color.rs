//! Color handling for screen elements.
//!
//! This module provides the [`Color`] type, an 8-bit-per-channel RGBA value.
//! Textual colors are parsed through the `DynamicColor` type from the color
//! crate, which supplies CSS syntax (`#rrggbb`, `rgb(...)`) and the named
//! color table.

use std::{fmt, str::FromStr};

use color::{DynamicColor, Srgb};
use thiserror::Error;

/// Errors produced while turning an attribute string into a [`Color`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Color is blank.")]
    Blank,

    #[error("Invalid color value: {0}")]
    InvalidValue(String),

    #[error("Invalid color name: {0}")]
    InvalidName(String),
}

/// An sRGB color with 8 bits per channel and straight alpha.
///
/// # Examples
///
/// ```
/// use screenc_core::color::Color;
///
/// let red = Color::new("Red").unwrap();
/// assert_eq!(red.to_rgb24(), 0xFF0000);
///
/// let teal = Color::from_numeric("0x008080").unwrap();
/// assert_eq!((teal.r(), teal.g(), teal.b()), (0, 0x80, 0x80));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Creates a color with an explicit alpha channel.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    ///
    /// Bits above the low 24 are ignored.
    pub const fn from_rgb24(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Parses a CSS color string such as `"red"`, `"#ff0000"` or
    /// `"rgb(255, 0, 0)"`. Names are matched case-insensitively.
    pub fn new(color_str: &str) -> Result<Self, ColorError> {
        let normalized = color_str.trim().to_ascii_lowercase();
        let dynamic = DynamicColor::from_str(&normalized)
            .map_err(|_| ColorError::InvalidName(color_str.to_string()))?;
        let rgba = dynamic.to_alpha_color::<Srgb>().to_rgba8();
        Ok(Self::rgba(rgba.r, rgba.g, rgba.b, rgba.a))
    }

    /// Parses an integer color value in decimal or `0x` hexadecimal form,
    /// interpreted as `0xRRGGBB`.
    pub fn from_numeric(value: &str) -> Result<Self, ColorError> {
        let trimmed = value.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => trimmed
                .parse::<i32>()
                .ok()
                .and_then(|v| u32::try_from(v).ok()),
        };

        parsed
            .map(Self::from_rgb24)
            .ok_or_else(|| ColorError::InvalidValue(value.to_string()))
    }

    pub fn r(self) -> u8 {
        self.r
    }

    pub fn g(self) -> u8 {
        self.g
    }

    pub fn b(self) -> u8 {
        self.b
    }

    /// Returns the alpha channel, 0 for fully transparent.
    pub fn alpha(self) -> u8 {
        self.a
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Returns the color channels packed as `0xRRGGBB`.
    pub fn to_rgb24(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Returns a copy with the color channels replaced and alpha kept.
    pub fn with_rgb(self, [r, g, b]: [u8; 3]) -> Self {
        Self::rgba(r, g, b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.to_rgb24())?;
        if self.a != 0xFF {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}
