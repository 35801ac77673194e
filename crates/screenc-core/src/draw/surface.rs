//! The RGBA raster a canvas is painted onto.

use std::convert::Infallible;

use embedded_graphics::{
    Pixel,
    pixelcolor::{Rgb888, RgbColor},
    prelude::{DrawTarget, OriginDimensions, Size as EgSize},
};

use crate::color::Color;

/// A `width × height` raster stored as row-major RGBA bytes.
///
/// A fresh surface is transparent black, which exports as zero bytes at
/// every color depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the raw RGBA bytes.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the color at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let index = self.index(x, y)?;
        let p = &self.pixels[index..index + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    /// Composites `color` over the pixel at `(x, y)`; out-of-bounds writes
    /// are dropped.
    pub fn blend(&mut self, x: i32, y: i32, color: Color) {
        let Some(index) = self.index(x, y) else {
            return;
        };
        let alpha = u32::from(color.alpha());
        if alpha == 0 {
            return;
        }

        let dst = &mut self.pixels[index..index + 4];
        if alpha == 0xFF {
            dst.copy_from_slice(&[color.r(), color.g(), color.b(), 0xFF]);
            return;
        }

        let inverse = 0xFF - alpha;
        for (channel, src) in dst.iter_mut().zip([color.r(), color.g(), color.b()]) {
            *channel = ((u32::from(src) * alpha + u32::from(*channel) * inverse) / 0xFF) as u8;
        }
        dst[3] = (alpha + u32::from(dst[3]) * inverse / 0xFF) as u8;
    }

    /// Borrows the surface as an `embedded-graphics` draw target that paints
    /// with the given opacity.
    pub fn painter(&mut self, alpha: u8) -> Painter<'_> {
        Painter {
            surface: self,
            alpha,
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|x| *x < self.width)?;
        let y = u32::try_from(y).ok().filter(|y| *y < self.height)?;
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

/// A draw target over a [`Surface`] that applies a fixed opacity.
pub struct Painter<'a> {
    surface: &'a mut Surface,
    alpha: u8,
}

impl DrawTarget for Painter<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let color = Color::rgba(color.r(), color.g(), color.b(), self.alpha);
            self.surface.blend(point.x, point.y, color);
        }
        Ok(())
    }
}

impl OriginDimensions for Painter<'_> {
    fn size(&self) -> EgSize {
        EgSize::new(self.surface.width, self.surface.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = Surface::new(2, 3);
        assert_eq!(surface.as_rgba().len(), 24);
        assert_eq!(surface.pixel(1, 2), Some(Color::TRANSPARENT));
        assert_eq!(surface.pixel(2, 0), None);
        assert_eq!(surface.pixel(-1, 0), None);
    }

    #[test]
    fn test_blend_opaque_and_translucent() {
        let mut surface = Surface::new(1, 1);
        surface.blend(0, 0, Color::rgb(0, 0, 0xFF));
        assert_eq!(surface.pixel(0, 0), Some(Color::rgb(0, 0, 0xFF)));

        surface.blend(0, 0, Color::rgba(0xFF, 0, 0, 0));
        assert_eq!(surface.pixel(0, 0), Some(Color::rgb(0, 0, 0xFF)));

        surface.blend(0, 0, Color::rgba(0xFF, 0, 0, 0xFF / 2 + 1));
        let blended = surface.pixel(0, 0).unwrap();
        assert_eq!(blended.r(), 0x80);
        assert_eq!(blended.b(), 0x7F);
        assert_eq!(blended.alpha(), 0xFF);
    }

    #[test]
    fn test_out_of_bounds_blend_is_ignored() {
        let mut surface = Surface::new(1, 1);
        surface.blend(5, 5, Color::WHITE);
        assert_eq!(surface.pixel(0, 0), Some(Color::TRANSPARENT));
    }
}
