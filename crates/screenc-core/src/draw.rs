//! Raster painting capabilities.
//!
//! The compiler never touches pixels itself. It hands a [`Primitive`] and the
//! absolute rectangle it occupies to a [`Rasterizer`], and asks a
//! [`TextMeasurer`] for the natural size of text it has to auto-size.
//! [`SoftwareRasterizer`] implements both on top of `embedded-graphics`.
mod font;
mod software;
mod surface;

pub use font::{DEFAULT_FONT_SIZE, FontError, FontSpec, FontStretch, FontStyle, FontWeight};
pub use software::SoftwareRasterizer;
pub use surface::{Painter, Surface};

use crate::{
    color::Color,
    geometry::{Point, Rect, Size},
};

/// Paints primitives onto a canvas surface.
pub trait Rasterizer {
    /// Paints `primitive` so that it occupies `rect`, in surface coordinates.
    ///
    /// Pixels outside `rect` must be left untouched.
    fn paint(&self, surface: &mut Surface, primitive: &Primitive<'_>, rect: Rect);
}

/// Reports the natural size of a run of text.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> TextExtent;
}

/// Natural size of a text run, possibly fractional.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

impl TextExtent {
    /// Rounds both dimensions up to whole pixels.
    pub fn ceil(self) -> Size {
        Size::new(self.width.ceil() as i32, self.height.ceil() as i32)
    }
}

/// An outline color and thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub color: Color,
    pub thickness: i32,
}

impl Stroke {
    pub fn new(color: Color, thickness: i32) -> Self {
        Self { color, thickness }
    }

    /// Returns true when painting this stroke would change no pixel.
    pub fn is_invisible(&self) -> bool {
        self.thickness <= 0 || self.color.is_transparent()
    }
}

/// A decoded RGBA image used as the content of `Image` elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Bitmap {
    /// Wraps `rgba`, which must hold exactly `width × height` pixels.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        (rgba.len() == width as usize * height as usize * 4).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.rgba[index..index + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }
}

/// A drawing request.
///
/// Coordinates inside a primitive are relative to the rectangle passed to
/// [`Rasterizer::paint`].
#[derive(Debug, Clone, Copy)]
pub enum Primitive<'a> {
    /// A rectangle with optional rounded corners.
    Rectangle {
        fill: Option<Color>,
        stroke: Option<Stroke>,
        radius: Size,
    },
    /// An ellipse inscribed in the rectangle.
    Ellipse {
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    /// A straight segment between two points.
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    /// Text centered in the rectangle over an optional background.
    Text {
        text: &'a str,
        font: &'a FontSpec,
        foreground: Color,
        background: Option<Color>,
    },
    /// An image scaled to the rectangle.
    Bitmap { image: &'a Bitmap },
}
