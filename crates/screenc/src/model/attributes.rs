//! Attribute tables.
//!
//! Each graphic variant accepts a fixed set of attribute names. The tables
//! below map a name to the setter that parses and stores its value; a name
//! found in no table of the variant is an [`ErrorKind::UnknownAttribute`].
//! `Width`, `Height` and `Location` are accepted by every variant.

use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

use indexmap::IndexMap;
use log::debug;

use screenc_core::{
    color::{Color, ColorError},
    depth::ColorDepth,
    draw::{Bitmap, FontSpec},
};

use super::graphic::{
    CanvasLayout, ColorDecl, Graphic, GraphicKind, GridLayout, HotSpotArea, ImageContent,
    LineShape, SetTarget, Shape, Spots, TextRun,
};
use crate::{
    error::ErrorKind,
    expr::{Environment, eval_int},
};

/// Session state an attribute value may refer to.
pub(crate) struct AttrScope<'a> {
    pub env: &'a Environment,
    pub colors: &'a IndexMap<String, Color>,
    pub fonts: &'a IndexMap<String, FontSpec>,
    /// Directory relative image paths are resolved against.
    pub base_dir: Option<&'a Path>,
}

impl AttrScope<'_> {
    fn int(&self, value: &str) -> Result<i32, ErrorKind> {
        Ok(eval_int(value, self.env)?)
    }

    /// Resolves a color string: numbers are `0xRRGGBB`, then declared
    /// colors, then CSS syntax and names.
    fn color(&self, value: &str) -> Result<Color, ErrorKind> {
        if value.is_empty() {
            return Err(ColorError::Blank.into());
        }
        if value.starts_with(|c: char| c.is_ascii_digit()) {
            return Ok(Color::from_numeric(value)?);
        }
        if let Some(color) = self.colors.get(value) {
            return Ok(*color);
        }
        Ok(Color::new(value)?)
    }

    fn font(&self, name: &str) -> Result<&FontSpec, ErrorKind> {
        self.fonts
            .get(name)
            .ok_or_else(|| ErrorKind::UnknownFont(name.to_string()))
    }

    fn load_image(&self, source: &str) -> Result<Rc<Bitmap>, ErrorKind> {
        let path = match self.base_dir {
            Some(base) if Path::new(source).is_relative() => base.join(source),
            _ => PathBuf::from(source),
        };
        let image_error = |reason: String| ErrorKind::Image {
            path: path.display().to_string(),
            reason,
        };

        let rgba = image::open(&path)
            .map_err(|err| image_error(err.to_string()))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!(path = path.display().to_string(), width = width, height = height; "Loaded image");
        Bitmap::from_rgba(width, height, rgba.into_raw())
            .map(Rc::new)
            .ok_or_else(|| image_error("pixel buffer does not match its size".to_string()))
    }
}

/// Evaluates a `StrideMultiple` or `WidthMultiple` value, which must be a
/// positive power of two.
pub(crate) fn parse_multiple(
    attribute: &str,
    value: &str,
    env: &Environment,
) -> Result<i32, ErrorKind> {
    let multiple = eval_int(value, env)?;
    if multiple > 0 && (multiple as u32).is_power_of_two() {
        Ok(multiple)
    } else {
        Err(ErrorKind::InvalidMultiple {
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
    }
}

type Setter<T> = fn(&mut T, &str, &AttrScope<'_>) -> Result<(), ErrorKind>;
type Table<T> = &'static [(&'static str, Setter<T>)];

fn dispatch<T>(
    table: Table<T>,
    target: &mut T,
    name: &str,
    value: &str,
    scope: &AttrScope<'_>,
) -> Option<Result<(), ErrorKind>> {
    table
        .iter()
        .find(|(entry, _)| *entry == name)
        .map(|(_, set)| set(target, value, scope))
}

const BASE_ATTRS: Table<Graphic> = &[
    ("Width", |g, v, s| {
        g.width = s.int(v)?;
        Ok(())
    }),
    ("Height", |g, v, s| {
        g.height = s.int(v)?;
        Ok(())
    }),
    ("Location", |g, v, _| {
        g.location = Some(v.to_string());
        Ok(())
    }),
];

const SHAPE_ATTRS: Table<Shape> = &[
    ("Fill", |shape, v, s| {
        shape.fill = Some(s.color(v)?);
        Ok(())
    }),
    ("Stroke", |shape, v, s| {
        shape.stroke = Some(s.color(v)?);
        Ok(())
    }),
    ("StrokeThickness", |shape, v, s| {
        shape.stroke_thickness = s.int(v)?;
        Ok(())
    }),
];

const CORNER_ATTRS: Table<Shape> = &[
    ("RadiusX", |shape, v, s| {
        shape.radius_x = s.int(v)?;
        Ok(())
    }),
    ("RadiusY", |shape, v, s| {
        shape.radius_y = s.int(v)?;
        Ok(())
    }),
];

const SPOT_ATTRS: Table<Spots> = &[
    ("HotSpot", |spots, v, _| {
        spots.hotspot = Some(v.to_string());
        Ok(())
    }),
    ("Group", |spots, v, _| {
        spots.group = Some(v.to_string());
        Ok(())
    }),
    ("Area", |spots, v, _| {
        spots.area = Some(v.to_string());
        Ok(())
    }),
];

const LINE_ATTRS: Table<LineShape> = &[
    ("X1", |line, v, s| {
        line.x1 = s.int(v)?;
        Ok(())
    }),
    ("Y1", |line, v, s| {
        line.y1 = s.int(v)?;
        Ok(())
    }),
    ("X2", |line, v, s| {
        line.x2 = s.int(v)?;
        Ok(())
    }),
    ("Y2", |line, v, s| {
        line.y2 = s.int(v)?;
        Ok(())
    }),
    ("Stroke", |line, v, s| {
        line.stroke = Some(s.color(v)?);
        Ok(())
    }),
    ("StrokeThickness", |line, v, s| {
        line.thickness = s.int(v)?;
        Ok(())
    }),
];

const TEXT_ATTRS: Table<TextRun> = &[
    ("Foreground", |text, v, s| {
        text.foreground = Some(s.color(v)?);
        Ok(())
    }),
    ("Background", |text, v, s| {
        text.background = Some(s.color(v)?);
        Ok(())
    }),
    ("Text", |text, v, _| {
        text.text = v.to_string();
        Ok(())
    }),
];

const FONT_ATTRS: Table<FontSpec> = &[
    ("FontFamily", |font, v, _| {
        font.set_family(v);
        Ok(())
    }),
    ("FontSize", |font, v, s| {
        font.set_size(s.int(v)?);
        Ok(())
    }),
    ("FontWeight", |font, v, _| {
        font.set_weight(v.parse()?);
        Ok(())
    }),
    ("FontStyle", |font, v, _| {
        font.set_style(v.parse()?);
        Ok(())
    }),
    ("FontStretch", |font, v, _| {
        font.set_stretch(v.parse()?);
        Ok(())
    }),
    ("Font", |font, v, s| {
        font.merge_from(s.font(v)?);
        Ok(())
    }),
];

const IMAGE_ATTRS: Table<ImageContent> = &[("Source", |image, v, s| {
    image.bitmap = Some(s.load_image(v)?);
    image.source = Some(v.to_string());
    Ok(())
})];

const HOTSPOT_ATTRS: Table<HotSpotArea> = &[("Group", |spot, v, _| {
    spot.group = Some(v.to_string());
    Ok(())
})];

const CANVAS_ATTRS: Table<CanvasLayout> = &[
    ("ColorDepth", |layout, v, _| {
        layout.color_depth = Some(v.to_string());
        Ok(())
    }),
    ("Type", |layout, v, _| {
        layout.type_tag = Some(v.to_string());
        Ok(())
    }),
    ("ItemWidth", |layout, v, s| {
        layout.item_width = s.int(v)?;
        Ok(())
    }),
    ("StrideMultiple", |layout, v, s| {
        layout.stride_multiple = parse_multiple("StrideMultiple", v, s.env)?;
        Ok(())
    }),
    ("WidthMultiple", |layout, v, s| {
        layout.width_multiple = parse_multiple("WidthMultiple", v, s.env)?;
        Ok(())
    }),
];

const SET_ATTRS: Table<SetTarget> = &[("RefName", |set, v, _| {
    set.ref_name = Some(v.to_string());
    Ok(())
})];

const GRID_ATTRS: Table<GridLayout> = &[
    ("RowHeight", |grid, v, s| {
        grid.row_height = s.int(v)?;
        Ok(())
    }),
    ("ColumnWidth", |grid, v, s| {
        grid.column_width = s.int(v)?;
        Ok(())
    }),
];

const COLOR_ATTRS: Table<ColorDecl> = &[
    ("Color", |decl, v, s| {
        decl.color = s.color(v)?;
        Ok(())
    }),
    ("ColorDepth", |decl, v, _| {
        decl.depth = Some(v.parse::<ColorDepth>()?);
        Ok(())
    }),
];

impl Graphic {
    /// Applies one attribute.
    ///
    /// `RefName` on a `Ref` needs the component registry and is handled by
    /// the builder before it gets here.
    pub(crate) fn set_attribute(
        &mut self,
        name: &str,
        value: &str,
        scope: &AttrScope<'_>,
    ) -> Result<(), ErrorKind> {
        if let Some(result) = dispatch(BASE_ATTRS, self, name, value, scope) {
            return result;
        }

        let result = match &mut self.kind {
            GraphicKind::Rectangle(shape) => dispatch(SHAPE_ATTRS, shape, name, value, scope)
                .or_else(|| dispatch(CORNER_ATTRS, shape, name, value, scope))
                .or_else(|| dispatch(SPOT_ATTRS, &mut shape.spots, name, value, scope)),
            GraphicKind::Ellipse(shape) => dispatch(SHAPE_ATTRS, shape, name, value, scope)
                .or_else(|| dispatch(SPOT_ATTRS, &mut shape.spots, name, value, scope)),
            GraphicKind::Canvas(shape, layout) => {
                dispatch(SHAPE_ATTRS, shape, name, value, scope)
                    .or_else(|| dispatch(CORNER_ATTRS, shape, name, value, scope))
                    .or_else(|| dispatch(SPOT_ATTRS, &mut shape.spots, name, value, scope))
                    .or_else(|| dispatch(CANVAS_ATTRS, layout, name, value, scope))
            }
            GraphicKind::Line(line) => dispatch(LINE_ATTRS, line, name, value, scope),
            GraphicKind::TextBlock(text) => dispatch(TEXT_ATTRS, text, name, value, scope)
                .or_else(|| dispatch(FONT_ATTRS, &mut text.font, name, value, scope))
                .or_else(|| dispatch(SPOT_ATTRS, &mut text.spots, name, value, scope)),
            GraphicKind::Image(image) => dispatch(IMAGE_ATTRS, image, name, value, scope)
                .or_else(|| dispatch(SPOT_ATTRS, &mut image.spots, name, value, scope)),
            GraphicKind::HotSpot(spot) => dispatch(HOTSPOT_ATTRS, spot, name, value, scope),
            GraphicKind::Set(set) | GraphicKind::SetString(set) => {
                dispatch(SET_ATTRS, set, name, value, scope)
            }
            GraphicKind::Grid(grid) => dispatch(GRID_ATTRS, grid, name, value, scope),
            GraphicKind::Font(font) => dispatch(FONT_ATTRS, font, name, value, scope),
            GraphicKind::Color(decl) => dispatch(COLOR_ATTRS, decl, name, value, scope),
            GraphicKind::Item
            | GraphicKind::Ref
            | GraphicKind::Row
            | GraphicKind::Column
            | GraphicKind::ColumnNoDefault
            | GraphicKind::Default { .. } => None,
        };

        result.unwrap_or_else(|| Err(ErrorKind::UnknownAttribute(name.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::expr::Value;

    struct Fixture {
        env: Environment,
        colors: IndexMap<String, Color>,
        fonts: IndexMap<String, FontSpec>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut env = Environment::new();
            env.set("a", Value::Int(10));
            let mut colors = IndexMap::new();
            colors.insert("Brand".to_string(), Color::rgb(1, 2, 3));
            let mut heading = FontSpec::default();
            heading.set_size(20);
            let mut fonts = IndexMap::new();
            fonts.insert("Heading".to_string(), heading);
            Self { env, colors, fonts }
        }

        fn scope(&self) -> AttrScope<'_> {
            AttrScope {
                env: &self.env,
                colors: &self.colors,
                fonts: &self.fonts,
                base_dir: None,
            }
        }
    }

    fn tables_have_unique_names<T>(tables: &[Table<T>]) -> bool {
        let mut seen = HashSet::new();
        tables
            .iter()
            .flat_map(|t| t.iter())
            .all(|(name, _)| seen.insert(*name))
    }

    #[test]
    fn test_tables_have_no_duplicates() {
        assert!(tables_have_unique_names(&[BASE_ATTRS]));
        assert!(tables_have_unique_names(&[SHAPE_ATTRS, CORNER_ATTRS]));
        assert!(tables_have_unique_names(&[SPOT_ATTRS]));
        assert!(tables_have_unique_names(&[TEXT_ATTRS]));
        assert!(tables_have_unique_names(&[FONT_ATTRS]));
        assert!(tables_have_unique_names(&[CANVAS_ATTRS]));
        assert!(tables_have_unique_names(&[LINE_ATTRS]));
    }

    #[test]
    fn test_rectangle_attributes() {
        let fixture = Fixture::new();
        let scope = fixture.scope();
        let mut rect = Graphic::for_tag("Rectangle", 1, 1).unwrap();
        rect.set_attribute("Width", "a * 2", &scope).unwrap();
        rect.set_attribute("Fill", "Brand", &scope).unwrap();
        rect.set_attribute("Stroke", "0x00FF00", &scope).unwrap();
        rect.set_attribute("HotSpot", "ok", &scope).unwrap();
        rect.set_attribute("RadiusX", "3", &scope).unwrap();

        assert_eq!(rect.width, 20);
        let GraphicKind::Rectangle(shape) = &rect.kind else {
            panic!("expected rectangle");
        };
        assert_eq!(shape.fill, Some(Color::rgb(1, 2, 3)));
        assert_eq!(shape.stroke, Some(Color::rgb(0, 0xFF, 0)));
        assert_eq!(shape.radius_x, 3);
        assert_eq!(shape.spots.hotspot.as_deref(), Some("ok"));
    }

    #[test]
    fn test_unknown_attribute() {
        let fixture = Fixture::new();
        let mut ellipse = Graphic::for_tag("Ellipse", 1, 1).unwrap();
        assert_eq!(
            ellipse.set_attribute("RadiusX", "3", &fixture.scope()),
            Err(ErrorKind::UnknownAttribute("RadiusX".to_string()))
        );
        let mut row = Graphic::for_tag("Row", 1, 1).unwrap();
        assert_eq!(
            row.set_attribute("Fill", "Red", &fixture.scope()),
            Err(ErrorKind::UnknownAttribute("Fill".to_string()))
        );
    }

    #[test]
    fn test_color_resolution() {
        let fixture = Fixture::new();
        let scope = fixture.scope();
        assert_eq!(scope.color(""), Err(ErrorKind::Color(ColorError::Blank)));
        assert_eq!(scope.color("255"), Ok(Color::rgb(0, 0, 0xFF)));
        assert_eq!(scope.color("red"), Ok(Color::rgb(0xFF, 0, 0)));
        assert!(matches!(
            scope.color("Bluish"),
            Err(ErrorKind::Color(ColorError::InvalidName(_)))
        ));
        assert!(matches!(
            scope.color("9z"),
            Err(ErrorKind::Color(ColorError::InvalidValue(_)))
        ));
    }

    #[test]
    fn test_text_block_fonts() {
        let fixture = Fixture::new();
        let scope = fixture.scope();
        let mut text = Graphic::for_tag("TextBlock", 1, 1).unwrap();
        text.set_attribute("FontWeight", "Bold", &scope).unwrap();
        text.set_attribute("Font", "Heading", &scope).unwrap();
        assert_eq!(
            text.set_attribute("Font", "Body", &scope),
            Err(ErrorKind::UnknownFont("Body".to_string()))
        );
        assert!(matches!(
            text.set_attribute("FontStyle", "Slanted", &scope),
            Err(ErrorKind::Font(_))
        ));

        let GraphicKind::TextBlock(run) = &text.kind else {
            panic!("expected text block");
        };
        assert_eq!(run.font.size(), 20);
        assert!(run.font.weight().is_bold());
    }

    #[test]
    fn test_multiples_must_be_powers_of_two() {
        let env = Environment::new();
        assert_eq!(parse_multiple("WidthMultiple", "8", &env), Ok(8));
        assert!(matches!(
            parse_multiple("WidthMultiple", "6", &env),
            Err(ErrorKind::InvalidMultiple { .. })
        ));
        assert!(parse_multiple("StrideMultiple", "0", &env).is_err());
    }

    #[test]
    fn test_missing_image_file() {
        let fixture = Fixture::new();
        let mut image = Graphic::for_tag("Image", 1, 1).unwrap();
        let err = image
            .set_attribute("Source", "does-not-exist.png", &fixture.scope())
            .unwrap_err();
        assert!(matches!(err, ErrorKind::Image { .. }));
    }
}
