//! The built-in rasterizer backed by `embedded-graphics`.

use std::convert::Infallible;

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::{Drawable, DrawTargetExt, Point as EgPoint, Primitive as _, Size as EgSize},
    primitives::{
        Ellipse, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle,
        StrokeAlignment,
    },
    text::{Baseline, Text},
};
use log::trace;

use super::{Bitmap, FontSpec, Primitive, Rasterizer, Stroke, Surface, TextExtent, TextMeasurer};
use crate::{color::Color, geometry::Rect};

/// Paints with the `embedded-graphics` primitives and its monospace bitmap
/// fonts.
///
/// Fills and strokes are painted separately so each can carry its own
/// opacity. Everything is clipped to the target rectangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareRasterizer;

impl SoftwareRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for SoftwareRasterizer {
    fn paint(&self, surface: &mut Surface, primitive: &Primitive<'_>, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        trace!(
            x = rect.x(), y = rect.y(), width = rect.width(), height = rect.height();
            "Painting primitive"
        );

        let area = eg_rect(rect);
        match *primitive {
            Primitive::Rectangle {
                fill,
                stroke,
                radius,
            } => {
                let corner = EgSize::new(
                    radius.width().max(0) as u32,
                    radius.height().max(0) as u32,
                );
                let stroke = stroke.filter(|s| !s.is_invisible());
                if corner.width == 0 || corner.height == 0 {
                    if let Some(fill) = visible(fill) {
                        draw(surface, fill, area, area.into_styled(fill_style(fill)));
                    }
                    if let Some(stroke) = stroke {
                        draw(surface, stroke.color, area, area.into_styled(stroke_style(stroke)));
                    }
                } else {
                    let shape = RoundedRectangle::with_equal_corners(area, corner);
                    if let Some(fill) = visible(fill) {
                        draw(surface, fill, area, shape.into_styled(fill_style(fill)));
                    }
                    if let Some(stroke) = stroke {
                        draw(surface, stroke.color, area, shape.into_styled(stroke_style(stroke)));
                    }
                }
            }
            Primitive::Ellipse { fill, stroke } => {
                let shape = Ellipse::new(area.top_left, area.size);
                if let Some(fill) = visible(fill) {
                    draw(surface, fill, area, shape.into_styled(fill_style(fill)));
                }
                if let Some(stroke) = stroke.filter(|s| !s.is_invisible()) {
                    draw(surface, stroke.color, area, shape.into_styled(stroke_style(stroke)));
                }
            }
            Primitive::Line { from, to, stroke } => {
                if stroke.is_invisible() {
                    return;
                }
                let origin = area.top_left;
                let line = Line::new(
                    origin + EgPoint::new(from.x(), from.y()),
                    origin + EgPoint::new(to.x(), to.y()),
                );
                let style = PrimitiveStyle::with_stroke(rgb(stroke.color), stroke.thickness as u32);
                draw(surface, stroke.color, area, line.into_styled(style));
            }
            Primitive::Text {
                text,
                font,
                foreground,
                background,
            } => {
                if let Some(background) = visible(background) {
                    draw(surface, background, area, area.into_styled(fill_style(background)));
                }
                paint_text(surface, text, font, foreground, area);
            }
            Primitive::Bitmap { image } => paint_bitmap(surface, image, rect),
        }
    }
}

impl TextMeasurer for SoftwareRasterizer {
    fn measure(&self, text: &str, font: &FontSpec) -> TextExtent {
        let mono = font.mono_font();
        let lines = text.split('\n').count().max(1);
        let longest = text
            .split('\n')
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        TextExtent {
            width: line_width(mono, longest) as f32,
            height: (lines as u32 * mono.character_size.height) as f32,
        }
    }
}

fn line_width(font: &MonoFont<'_>, chars: usize) -> u32 {
    let chars = chars as u32;
    if chars == 0 {
        return 0;
    }
    chars * font.character_size.width + (chars - 1) * font.character_spacing
}

fn paint_text(surface: &mut Surface, text: &str, font: &FontSpec, color: Color, area: Rectangle) {
    if color.is_transparent() {
        return;
    }
    let mono = font.mono_font();
    let style = MonoTextStyle::new(mono, rgb(color));
    let line_height = mono.character_size.height as i32;
    let lines: Vec<&str> = text.split('\n').collect();

    let block_height = line_height * lines.len() as i32;
    let mut y = area.top_left.y + (area.size.height as i32 - block_height) / 2;
    let mut painter = surface.painter(color.alpha());
    let mut clipped = painter.clipped(&area);
    for line in lines {
        let width = line_width(mono, line.chars().count()) as i32;
        let x = area.top_left.x + (area.size.width as i32 - width) / 2;
        let glyphs = Text::with_baseline(line, EgPoint::new(x, y), style, Baseline::Top);
        infallible(glyphs.draw(&mut clipped));
        y += line_height;
    }
}

/// Nearest-neighbour scales `image` into `rect`, honoring per-pixel alpha.
fn paint_bitmap(surface: &mut Surface, image: &Bitmap, rect: Rect) {
    if image.width() == 0 || image.height() == 0 {
        return;
    }
    let (width, height) = (rect.width() as u32, rect.height() as u32);
    for dy in 0..height {
        let sy = dy * image.height() / height;
        for dx in 0..width {
            let sx = dx * image.width() / width;
            if let Some(pixel) = image.pixel(sx, sy) {
                surface.blend(rect.x() + dx as i32, rect.y() + dy as i32, pixel);
            }
        }
    }
}

fn draw<D>(surface: &mut Surface, color: Color, area: Rectangle, shape: D)
where
    D: Drawable<Color = Rgb888, Output = ()>,
{
    let mut painter = surface.painter(color.alpha());
    infallible(shape.draw(&mut painter.clipped(&area)));
}

fn fill_style(color: Color) -> PrimitiveStyle<Rgb888> {
    PrimitiveStyle::with_fill(rgb(color))
}

fn stroke_style(stroke: Stroke) -> PrimitiveStyle<Rgb888> {
    PrimitiveStyleBuilder::new()
        .stroke_color(rgb(stroke.color))
        .stroke_width(stroke.thickness as u32)
        .stroke_alignment(StrokeAlignment::Inside)
        .build()
}

fn visible(color: Option<Color>) -> Option<Color> {
    color.filter(|c| !c.is_transparent())
}

fn rgb(color: Color) -> Rgb888 {
    Rgb888::new(color.r(), color.g(), color.b())
}

fn eg_rect(rect: Rect) -> Rectangle {
    Rectangle::new(
        EgPoint::new(rect.x(), rect.y()),
        EgSize::new(rect.width().max(0) as u32, rect.height().max(0) as u32),
    )
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
