//! Packed pixel formats and the color quantizer.
//!
//! Firmware consumes images in one of three packed layouts:
//!
//! | Depth        | Bytes | Layout (MSB → LSB)          |
//! |--------------|-------|-----------------------------|
//! | `Color8bpp`  | 1     | `RRRGGGBB`                  |
//! | `Color16bpp` | 2     | `RRRRRGGGGGGBBBBB`, little-endian |
//! | `Color24bpp` | 3     | `R`, `G`, `B` bytes         |
//!
//! Two reductions exist and are deliberately separate:
//!
//! - [`quantize`] packs for export and stores only the truncated high bits.
//! - [`ColorDepth::limit`] approximates the reduced color for preview and
//!   palette declarations, repeating the retained bits downward
//!   ([`limit_channel`]).

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Error for a color depth tag that is not one of the recognized names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized color depth '{0}'")]
pub struct UnknownColorDepth(pub String);

/// Target pixel format of an exported image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorDepth {
    /// 3:3:2 red:green:blue in one byte.
    Color8bpp,
    /// 5:6:5 red:green:blue in two little-endian bytes.
    Color16bpp,
    /// 8 bits per channel, stored R, G, B.
    Color24bpp,
}

impl ColorDepth {
    /// Returns the tag used in documents and emitted headers.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorDepth::Color8bpp => "Color8bpp",
            ColorDepth::Color16bpp => "Color16bpp",
            ColorDepth::Color24bpp => "Color24bpp",
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ColorDepth::Color8bpp => 1,
            ColorDepth::Color16bpp => 2,
            ColorDepth::Color24bpp => 3,
        }
    }

    /// Returns the retained bit count of the red, green and blue channels.
    pub fn channel_bits(self) -> [u32; 3] {
        match self {
            ColorDepth::Color8bpp => [3, 3, 2],
            ColorDepth::Color16bpp => [5, 6, 5],
            ColorDepth::Color24bpp => [8, 8, 8],
        }
    }

    /// Appends the packed form of one pixel to `out`.
    pub fn pack_into(self, [r, g, b]: [u8; 3], out: &mut Vec<u8>) {
        match self {
            ColorDepth::Color8bpp => {
                out.push((r & 0xE0) | ((g & 0xE0) >> 3) | (b >> 6));
            }
            ColorDepth::Color16bpp => {
                let pixel =
                    (u16::from(r & 0xF8) << 8) | (u16::from(g & 0xFC) << 3) | u16::from(b >> 3);
                out.extend_from_slice(&pixel.to_le_bytes());
            }
            ColorDepth::Color24bpp => out.extend_from_slice(&[r, g, b]),
        }
    }

    /// Reverses [`ColorDepth::pack_into`] for one pixel.
    ///
    /// The recovered channels carry the packed bits in their high positions
    /// and zeros below. Returns `None` when `bytes` is shorter than
    /// [`ColorDepth::bytes_per_pixel`].
    pub fn unpack(self, bytes: &[u8]) -> Option<[u8; 3]> {
        match self {
            ColorDepth::Color8bpp => {
                let p = *bytes.first()?;
                Some([p & 0xE0, (p << 3) & 0xE0, (p << 6) & 0xC0])
            }
            ColorDepth::Color16bpp => {
                let p = u16::from_le_bytes([*bytes.first()?, *bytes.get(1)?]);
                Some([
                    ((p >> 8) & 0xF8) as u8,
                    ((p >> 3) & 0xFC) as u8,
                    ((p << 3) & 0xF8) as u8,
                ])
            }
            ColorDepth::Color24bpp => Some([*bytes.first()?, *bytes.get(1)?, *bytes.get(2)?]),
        }
    }

    /// Approximates a color at this depth with bit replication.
    ///
    /// # Examples
    ///
    /// ```
    /// # use screenc_core::depth::ColorDepth;
    /// assert_eq!(ColorDepth::Color8bpp.limit([0xFF, 0x20, 0x40]), [0xFF, 0x24, 0x55]);
    /// assert_eq!(ColorDepth::Color24bpp.limit([1, 2, 3]), [1, 2, 3]);
    /// ```
    pub fn limit(self, rgb: [u8; 3]) -> [u8; 3] {
        let bits = self.channel_bits();
        [
            limit_channel(rgb[0], bits[0]),
            limit_channel(rgb[1], bits[1]),
            limit_channel(rgb[2], bits[2]),
        ]
    }
}

impl fmt::Display for ColorDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorDepth {
    type Err = UnknownColorDepth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Color8bpp" => Ok(ColorDepth::Color8bpp),
            "Color16bpp" => Ok(ColorDepth::Color16bpp),
            "Color24bpp" => Ok(ColorDepth::Color24bpp),
            other => Err(UnknownColorDepth(other.to_string())),
        }
    }
}

/// Keeps the top `bits` of a channel and repeats them through the low bits.
///
/// `0b101_00000` limited to 3 bits becomes `0b101_101_10`.
pub fn limit_channel(value: u8, bits: u32) -> u8 {
    if bits == 0 || bits >= 8 {
        return if bits == 0 { 0 } else { value };
    }

    let mask = (0xFF00_u32 >> bits) & 0xFF;
    let retained = u32::from(value) & mask;
    let mut result = retained;
    let mut shifted = retained;
    loop {
        shifted >>= bits;
        if shifted == 0 {
            break;
        }
        result |= shifted;
    }
    result as u8
}

/// Packs an RGBA buffer into `depth`, dropping alpha.
///
/// `rgba` is read four bytes per pixel; a trailing partial pixel is ignored.
pub fn quantize(rgba: &[u8], depth: ColorDepth) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 4 * depth.bytes_per_pixel());
    for pixel in rgba.chunks_exact(4) {
        depth.pack_into([pixel[0], pixel[1], pixel[2]], &mut out);
    }
    out
}

/// Packs a `width × height` RGBA raster into rows of `stride` pixels.
///
/// Pixels between `width` and `stride` in every row are zero bytes.
pub fn quantize_rows(
    rgba: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    depth: ColorDepth,
) -> Vec<u8> {
    let bpp = depth.bytes_per_pixel();
    let stride = stride.max(width);
    let mut out = Vec::with_capacity(height * stride * bpp);
    for row in 0..height {
        let start = row * width * 4;
        let end = (start + width * 4).min(rgba.len());
        let line = rgba.get(start..end).unwrap_or_default();
        out.extend(quantize(line, depth));
        out.resize((row + 1) * stride * bpp, 0);
    }
    out
}
