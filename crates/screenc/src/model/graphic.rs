//! Graphic variants and their per-variant state.

use std::rc::Rc;

use screenc_core::{
    color::Color,
    depth::ColorDepth,
    draw::{Bitmap, FontSpec},
    geometry::round_up,
};

use crate::error::ErrorKind;

/// Optional metadata names an area-capable graphic records when drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spots {
    pub hotspot: Option<String>,
    pub group: Option<String>,
    pub area: Option<String>,
}

/// Paint state shared by rectangles, ellipses and canvases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shape {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_thickness: i32,
    pub radius_x: i32,
    pub radius_y: i32,
    pub spots: Spots,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineShape {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub stroke: Option<Color>,
    pub thickness: i32,
}

impl Default for LineShape {
    fn default() -> Self {
        Self {
            x1: 0,
            y1: 0,
            x2: 0,
            y2: 0,
            stroke: None,
            thickness: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRun {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub font: FontSpec,
    pub text: String,
    pub spots: Spots,
}

/// A decoded image. Copies share the pixels, which are never mutated.
#[derive(Debug, Clone, Default)]
pub struct ImageContent {
    pub source: Option<String>,
    pub bitmap: Option<Rc<Bitmap>>,
    pub spots: Spots,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotSpotArea {
    pub group: Option<String>,
}

/// Canvas-only geometry and export settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasLayout {
    /// Kept as written; validated when the image is produced.
    pub color_depth: Option<String>,
    pub type_tag: Option<String>,
    pub item_width: i32,
    pub stride_multiple: i32,
    pub width_multiple: i32,
    /// Row length in pixels, derived from the rounded width.
    pub stride: i32,
}

impl CanvasLayout {
    pub fn new(stride_multiple: i32, width_multiple: i32) -> Self {
        Self {
            color_depth: None,
            type_tag: None,
            item_width: 0,
            stride_multiple,
            width_multiple,
            stride: 0,
        }
    }

    /// Rounds `width` to the width multiple, updates the stride and returns
    /// the rounded width.
    pub fn round_width(&mut self, width: i32) -> i32 {
        let rounded = round_up(width, self.width_multiple);
        self.stride = round_up(rounded, self.stride_multiple);
        rounded
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetTarget {
    pub ref_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridLayout {
    pub row_height: i32,
    pub column_width: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorDecl {
    pub color: Color,
    pub depth: Option<ColorDepth>,
}

/// The behavior an element tag selects.
#[derive(Debug, Clone)]
pub enum GraphicKind {
    Rectangle(Shape),
    /// Its location is the center, not the top-left corner.
    Ellipse(Shape),
    Line(LineShape),
    TextBlock(TextRun),
    Image(ImageContent),
    HotSpot(HotSpotArea),
    Canvas(Shape, CanvasLayout),
    Item,
    Ref,
    Set(SetTarget),
    SetString(SetTarget),
    Grid(GridLayout),
    Row,
    Column,
    ColumnNoDefault,
    /// `is_copy` marks content substituted into a column, as opposed to the
    /// placeholder the author wrote.
    Default { is_copy: bool },
    Font(FontSpec),
    Color(ColorDecl),
}

/// A named registration produced when a declaration element completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Font(FontSpec),
    Color(Color),
}

/// The graphic of one element. A width or height of 0 is unresolved.
#[derive(Debug, Clone)]
pub struct Graphic {
    pub width: i32,
    pub height: i32,
    pub location: Option<String>,
    pub kind: GraphicKind,
}

impl Graphic {
    pub fn new(kind: GraphicKind) -> Self {
        Self {
            width: 0,
            height: 0,
            location: None,
            kind,
        }
    }

    /// Creates the graphic for an element tag, or `None` for tags that
    /// build plain containers.
    pub fn for_tag(tag: &str, stride_multiple: i32, width_multiple: i32) -> Option<Self> {
        let kind = match tag {
            "Rectangle" => GraphicKind::Rectangle(Shape::default()),
            "Ellipse" => GraphicKind::Ellipse(Shape::default()),
            "Line" => GraphicKind::Line(LineShape::default()),
            "TextBlock" => GraphicKind::TextBlock(TextRun::default()),
            "Image" => GraphicKind::Image(ImageContent::default()),
            "HotSpot" => GraphicKind::HotSpot(HotSpotArea::default()),
            "Canvas" => GraphicKind::Canvas(
                Shape::default(),
                CanvasLayout::new(stride_multiple, width_multiple),
            ),
            "Item" => GraphicKind::Item,
            "Ref" => GraphicKind::Ref,
            "Set" => GraphicKind::Set(SetTarget::default()),
            "SetString" => GraphicKind::SetString(SetTarget::default()),
            "Grid" => GraphicKind::Grid(GridLayout::default()),
            "Row" => GraphicKind::Row,
            "Column" => GraphicKind::Column,
            "ColumnNoDefault" => GraphicKind::ColumnNoDefault,
            "Default" => GraphicKind::Default { is_copy: false },
            "Font" => GraphicKind::Font(FontSpec::default()),
            "Color" => GraphicKind::Color(ColorDecl::default()),
            _ => return None,
        };
        Some(Self::new(kind))
    }

    /// Returns the hotspot/area names of area-capable variants.
    pub fn spots(&self) -> Option<&Spots> {
        match &self.kind {
            GraphicKind::Rectangle(shape)
            | GraphicKind::Ellipse(shape)
            | GraphicKind::Canvas(shape, _) => Some(&shape.spots),
            GraphicKind::TextBlock(text) => Some(&text.spots),
            GraphicKind::Image(image) => Some(&image.spots),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self.kind, GraphicKind::Set(_) | GraphicKind::SetString(_))
    }

    /// Runs the variant's completion step once all attributes are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::CanvasWidth`] when a canvas sets both or neither
    /// of `Width` and `ItemWidth`.
    pub fn complete(&mut self) -> Result<Option<Declaration>, ErrorKind> {
        match &mut self.kind {
            GraphicKind::Canvas(_, layout) => {
                if (self.width != 0) == (layout.item_width != 0) {
                    return Err(ErrorKind::CanvasWidth);
                }
                self.width = layout.round_width(self.width);
                Ok(None)
            }
            GraphicKind::Font(spec) => Ok(Some(Declaration::Font(spec.clone()))),
            GraphicKind::Color(decl) => {
                let color = match decl.depth {
                    Some(depth) => {
                        let c = decl.color;
                        c.with_rgb(depth.limit([c.r(), c.g(), c.b()]))
                    }
                    None => decl.color,
                };
                decl.color = color;
                Ok(Some(Declaration::Color(color)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag_has_no_graphic() {
        assert!(Graphic::for_tag("Screens", 1, 1).is_none());
        assert!(Graphic::for_tag("Component", 1, 1).is_none());
        assert!(Graphic::for_tag("Rectangle", 1, 1).is_some());
    }

    #[test]
    fn test_canvas_width_rounding() {
        let mut canvas = Graphic::for_tag("Canvas", 8, 4).unwrap();
        canvas.width = 13;
        canvas.height = 2;
        assert_eq!(canvas.complete(), Ok(None));
        assert_eq!(canvas.width, 16);
        let GraphicKind::Canvas(_, layout) = &canvas.kind else {
            panic!("expected canvas");
        };
        assert_eq!(layout.stride, 16);

        let mut narrow = Graphic::for_tag("Canvas", 32, 1).unwrap();
        narrow.width = 10;
        narrow.complete().unwrap();
        assert_eq!(narrow.width, 10);
        let GraphicKind::Canvas(_, layout) = &narrow.kind else {
            panic!("expected canvas");
        };
        assert_eq!(layout.stride, 32);
    }

    #[test]
    fn test_canvas_requires_one_width() {
        let mut canvas = Graphic::for_tag("Canvas", 1, 1).unwrap();
        assert_eq!(canvas.complete(), Err(ErrorKind::CanvasWidth));

        canvas.width = 10;
        if let GraphicKind::Canvas(_, layout) = &mut canvas.kind {
            layout.item_width = 5;
        }
        assert_eq!(canvas.complete(), Err(ErrorKind::CanvasWidth));
    }

    #[test]
    fn test_color_declaration_is_limited() {
        let mut color = Graphic::new(GraphicKind::Color(ColorDecl {
            color: Color::rgb(0xA0, 0x20, 0x40),
            depth: Some(ColorDepth::Color8bpp),
        }));
        assert_eq!(
            color.complete(),
            Ok(Some(Declaration::Color(Color::rgb(0xB6, 0x24, 0x55))))
        );
    }
}
