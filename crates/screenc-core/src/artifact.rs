//! Finished screen images and the metadata collected while drawing them.
//!
//! A canvas walk fills a [`DrawResults`]; once the walk completes it is frozen
//! into a [`NamedBitmap`] that owns both the RGBA surface and the packed pixel
//! buffer handed to the exporter.

use std::fmt;

use crate::{
    depth::{ColorDepth, quantize_rows},
    draw::Surface,
};

/// A named point in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }
}

/// A named rectangle without input semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Area {
    pub fn new(name: impl Into<String>, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            width,
            height,
        }
    }
}

/// A named touch region with inclusive bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotSpot {
    pub name: String,
    /// Group tag; empty when the element set none.
    pub group: String,
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl HotSpot {
    /// Creates a hotspot covering the `width × height` pixels at `(x, y)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use screenc_core::artifact::HotSpot;
    /// let spot = HotSpot::new("ok", "", 10, 20, 30, 5);
    /// assert_eq!((spot.max_x, spot.max_y), (39, 24));
    /// ```
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            min_x: x,
            min_y: y,
            max_x: x + width - 1,
            max_y: y + height - 1,
        }
    }
}

/// The payload of a recorded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueData {
    Int(i32),
    Str(String),
}

impl fmt::Display for ValueData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueData::Int(v) => write!(f, "{v}"),
            ValueData::Str(s) => f.write_str(s),
        }
    }
}

/// A named scalar exported for firmware use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowValue {
    pub name: String,
    pub value: ValueData,
}

impl ShowValue {
    pub fn new(name: impl Into<String>, value: ValueData) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Everything a single canvas walk produces.
#[derive(Debug, Clone)]
pub struct DrawResults {
    pub surface: Surface,
    pub locations: Vec<Location>,
    pub areas: Vec<Area>,
    pub hotspots: Vec<HotSpot>,
    pub values: Vec<ShowValue>,
}

impl DrawResults {
    /// Starts a walk over a fresh transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Surface::new(width, height),
            locations: Vec::new(),
            areas: Vec::new(),
            hotspots: Vec::new(),
            values: Vec::new(),
        }
    }
}

/// A rendered canvas ready for export.
///
/// `stride` counts pixels, not bytes. The packed buffer is always
/// `height × stride × bytes_per_pixel` long.
#[derive(Debug, Clone)]
pub struct NamedBitmap {
    name: String,
    width: u32,
    height: u32,
    stride: u32,
    depth: ColorDepth,
    type_tag: Option<String>,
    packed: Vec<u8>,
    surface: Surface,
    locations: Vec<Location>,
    areas: Vec<Area>,
    hotspots: Vec<HotSpot>,
    values: Vec<ShowValue>,
}

impl NamedBitmap {
    /// Freezes a finished walk, quantizing its surface to `depth`.
    pub fn new(
        name: impl Into<String>,
        results: DrawResults,
        stride: u32,
        depth: ColorDepth,
        type_tag: Option<String>,
    ) -> Self {
        let DrawResults {
            surface,
            locations,
            areas,
            hotspots,
            values,
        } = results;
        let (width, height) = (surface.width(), surface.height());
        let stride = stride.max(width);
        let packed = quantize_rows(
            surface.as_rgba(),
            width as usize,
            height as usize,
            stride as usize,
            depth,
        );

        Self {
            name: name.into(),
            width,
            height,
            stride,
            depth,
            type_tag: type_tag.filter(|t| !t.is_empty()),
            packed,
            surface,
            locations,
            areas,
            hotspots,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row length in pixels, including padding.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    /// Returns the export grouping tag, if any.
    pub fn type_tag(&self) -> Option<&str> {
        self.type_tag.as_deref()
    }

    /// Returns the packed pixel stream written to the binary file.
    pub fn packed(&self) -> &[u8] {
        &self.packed
    }

    /// Size in bytes of [`NamedBitmap::packed`].
    pub fn byte_size(&self) -> usize {
        self.height as usize * self.stride as usize * self.depth.bytes_per_pixel()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn hotspots(&self) -> &[HotSpot] {
        &self.hotspots
    }

    pub fn values(&self) -> &[ShowValue] {
        &self.values
    }

    /// Returns the surface as RGBA with every color reduced to the canvas
    /// depth by bit replication, approximating what the device shows.
    pub fn preview(&self) -> Vec<u8> {
        let mut out = self.surface.as_rgba().to_vec();
        for pixel in out.chunks_exact_mut(4) {
            let [r, g, b] = self.depth.limit([pixel[0], pixel[1], pixel[2]]);
            pixel[..3].copy_from_slice(&[r, g, b]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn red_results(width: u32, height: u32) -> DrawResults {
        let mut results = DrawResults::new(width, height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                results.surface.blend(x, y, Color::rgb(0xFF, 0, 0));
            }
        }
        results
    }

    #[test]
    fn test_hotspot_bounds_are_inclusive() {
        let spot = HotSpot::new("h1", "", 0, 0, 10, 10);
        assert_eq!((spot.min_x, spot.min_y, spot.max_x, spot.max_y), (0, 0, 9, 9));
    }

    #[test]
    fn test_named_bitmap_packs_24bpp() {
        let bitmap = NamedBitmap::new("c", red_results(2, 2), 2, ColorDepth::Color24bpp, None);
        assert_eq!(bitmap.packed().len(), 12);
        assert_eq!(bitmap.byte_size(), 12);
        assert!(bitmap.packed().chunks(3).all(|p| p == [0xFF, 0, 0]));
    }

    #[test]
    fn test_named_bitmap_pads_stride() {
        let bitmap = NamedBitmap::new("c", red_results(3, 1), 4, ColorDepth::Color8bpp, None);
        assert_eq!(bitmap.stride(), 4);
        assert_eq!(bitmap.packed(), &[0xE0, 0xE0, 0xE0, 0x00]);
    }

    #[test]
    fn test_empty_type_tag_is_none() {
        let bitmap = NamedBitmap::new(
            "c",
            DrawResults::new(1, 1),
            1,
            ColorDepth::Color16bpp,
            Some(String::new()),
        );
        assert_eq!(bitmap.type_tag(), None);
    }

    #[test]
    fn test_preview_replicates_bits() {
        let mut results = DrawResults::new(1, 1);
        results.surface.blend(0, 0, Color::rgb(0xA0, 0x20, 0x40));
        let bitmap = NamedBitmap::new("c", results, 1, ColorDepth::Color8bpp, None);
        assert_eq!(bitmap.preview(), vec![0xB6, 0x24, 0x55, 0xFF]);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(ValueData::Int(-4).to_string(), "-4");
        assert_eq!(ValueData::Str("hi".into()).to_string(), "hi");
    }
}
