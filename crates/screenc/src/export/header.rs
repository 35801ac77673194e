//! The C header describing a compiled screen file.
//!
//! Every macro the header uses is first declared empty behind an `#ifndef`
//! guard, so an including file may define only the macros it cares about.
//! All of them are `#undef`ed again at the end.

use std::fmt::{self, Write as _};

use indexmap::IndexMap;

use screenc_core::{
    artifact::{HotSpot, NamedBitmap, ShowValue, ValueData},
    color::Color,
};

use crate::config::NameStyle;

const START_SCREEN: &str = "START_SCREEN";
const IMAGE_ADDRESS: &str = "IMAGE_ADDRESS";
const IMAGE_SIZE: &str = "IMAGE_SIZE";
const IMAGE_WIDTH: &str = "IMAGE_WIDTH";
const IMAGE_HEIGHT: &str = "IMAGE_HEIGHT";
const IMAGE_STRIDE: &str = "IMAGE_STRIDE";
const IMAGE_DEPTH: &str = "IMAGE_DEPTH";
const END_SCREEN: &str = "END_SCREEN";

const START_HOTSPOTS: &str = "START_HOTSPOTS";
const DEFINE_HOTSPOT: &str = "DEFINE_HOTSPOT";
const END_HOTSPOTS: &str = "END_HOTSPOTS";
const HOTSPOT_COUNT: &str = "HOTSPOT_COUNT";

const START_LOCATIONS: &str = "START_LOCATIONS";
const DEFINE_LOCATION: &str = "DEFINE_LOCATION";
const END_LOCATIONS: &str = "END_LOCATIONS";

const START_AREAS: &str = "START_AREAS";
const DEFINE_AREA: &str = "DEFINE_AREA";
const END_AREAS: &str = "END_AREAS";

const START_GROUP: &str = "START_GROUP";
const GROUP_HOTSPOT: &str = "GROUP_HOTSPOT";
const END_GROUP: &str = "END_GROUP";

const START_VALUES: &str = "START_VALUES";
const DEFINE_VALUE: &str = "DEFINE_VALUE";
const END_VALUES: &str = "END_VALUES";

const START_STR_VALUES: &str = "START_STR_VALUES";
const DEFINE_STR_VALUE: &str = "DEFINE_STR_VALUE";
const END_STR_VALUES: &str = "END_STR_VALUES";

const START_COLORS: &str = "START_COLORS";
const DEFINE_COLOR: &str = "DEFINE_COLOR";
const END_COLORS: &str = "END_COLORS";

const SCREEN_FILE_LENGTH: &str = "SCREEN_FILE_LENGTH";

/// Every base macro with its parameter count, in declaration order.
pub(crate) const BASE_MACROS: &[(&str, usize)] = &[
    (START_SCREEN, 1),
    (IMAGE_ADDRESS, 1),
    (IMAGE_SIZE, 1),
    (IMAGE_WIDTH, 1),
    (IMAGE_HEIGHT, 1),
    (IMAGE_STRIDE, 1),
    (IMAGE_DEPTH, 1),
    (END_SCREEN, 1),
    (START_HOTSPOTS, 1),
    (DEFINE_HOTSPOT, 6),
    (END_HOTSPOTS, 1),
    (HOTSPOT_COUNT, 2),
    (START_LOCATIONS, 1),
    (DEFINE_LOCATION, 3),
    (END_LOCATIONS, 1),
    (START_AREAS, 1),
    (DEFINE_AREA, 5),
    (END_AREAS, 1),
    (START_GROUP, 1),
    (GROUP_HOTSPOT, 6),
    (END_GROUP, 1),
    (START_VALUES, 0),
    (DEFINE_VALUE, 2),
    (END_VALUES, 0),
    (START_STR_VALUES, 0),
    (DEFINE_STR_VALUE, 2),
    (END_STR_VALUES, 0),
    (START_COLORS, 0),
    (DEFINE_COLOR, 2),
    (END_COLORS, 0),
    (SCREEN_FILE_LENGTH, 1),
];

/// The per-image macros repeated with a `_<type>` suffix for typed images.
const SCREEN_MACROS: [&str; 8] = [
    START_SCREEN,
    IMAGE_ADDRESS,
    IMAGE_SIZE,
    IMAGE_WIDTH,
    IMAGE_HEIGHT,
    IMAGE_STRIDE,
    IMAGE_DEPTH,
    END_SCREEN,
];

fn parameters(arity: usize) -> &'static str {
    match arity {
        0 => "",
        1 => "a",
        2 => "a,b",
        3 => "a,b,c",
        5 => "a,b,c,d,e",
        _ => "a,b,c,d,e,f",
    }
}

/// Makes `name` usable as a macro name suffix.
pub(crate) fn macro_suffix(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A typed image waiting for its type table.
struct Deferred<'a> {
    image: &'a NamedBitmap,
    offset: usize,
}

struct HeaderWriter<'a> {
    out: String,
    style: NameStyle,
    offset: usize,
    groups: IndexMap<&'a str, Vec<&'a HotSpot>>,
    types: IndexMap<&'a str, Vec<Deferred<'a>>>,
}

impl<'a> HeaderWriter<'a> {
    fn new(style: NameStyle) -> Self {
        Self {
            out: String::new(),
            style,
            offset: 0,
            groups: IndexMap::new(),
            types: IndexMap::new(),
        }
    }

    fn name(&self, name: &str) -> String {
        match self.style {
            NameStyle::Quoted => quote(name),
            NameStyle::Identifier => name.to_string(),
        }
    }

    fn blank(&mut self) -> fmt::Result {
        writeln!(self.out)
    }

    fn predefine(&mut self, name: &str, arity: usize) -> fmt::Result {
        writeln!(
            self.out,
            "#ifndef {name}\n#define {name}({})\n#endif",
            parameters(arity)
        )
    }

    fn undefine(&mut self, name: &str) -> fmt::Result {
        writeln!(self.out, "#undef {name}")
    }

    /// Writes `MACRO(arg)` at the start of a line.
    fn head(&mut self, name: &str, arg: impl fmt::Display) -> fmt::Result {
        writeln!(self.out, "{name}({arg})")
    }

    /// Writes a tab-indented `MACRO(arg)`.
    fn entry(&mut self, name: &str, arg: impl fmt::Display) -> fmt::Result {
        writeln!(self.out, "\t{name}({arg})")
    }

    fn hotspot(&mut self, macro_name: &str, spot: &HotSpot) -> fmt::Result {
        let args = format!(
            "{}, {}, {}, {}, {}, {}",
            self.name(&spot.name),
            self.name(&spot.group),
            spot.min_x,
            spot.min_y,
            spot.max_x,
            spot.max_y
        );
        self.entry(macro_name, args)
    }

    fn preamble(&mut self) -> fmt::Result {
        for (name, arity) in BASE_MACROS {
            self.predefine(name, *arity)?;
        }
        Ok(())
    }

    fn colors(&mut self, colors: &IndexMap<String, Color>) -> fmt::Result {
        if colors.is_empty() {
            return Ok(());
        }
        self.blank()?;
        self.head(START_COLORS, "")?;
        for (name, color) in colors {
            let args = format!("{}, 0x{:06X}", self.name(name), color.to_rgb24());
            self.entry(DEFINE_COLOR, args)?;
        }
        self.head(END_COLORS, "")
    }

    fn values(&mut self, values: &[ShowValue]) -> fmt::Result {
        if values.is_empty() {
            return Ok(());
        }

        self.blank()?;
        self.head(START_VALUES, "")?;
        for value in values {
            if let ValueData::Int(number) = &value.value {
                let args = format!("{}, {number}", self.name(&value.name));
                self.entry(DEFINE_VALUE, args)?;
            }
        }
        self.head(END_VALUES, "")?;

        self.blank()?;
        self.head(START_STR_VALUES, "")?;
        for value in values {
            if let ValueData::Str(text) = &value.value {
                let args = format!("{}, {}", self.name(&value.name), quote(text));
                self.entry(DEFINE_STR_VALUE, args)?;
            }
        }
        self.head(END_STR_VALUES, "")
    }

    fn screen_block(&mut self, suffix: &str, image: &NamedBitmap, offset: usize) -> fmt::Result {
        let [start, address, size, width, height, stride, depth, end] =
            SCREEN_MACROS.map(|name| format!("{name}{suffix}"));
        let name = self.name(image.name());

        self.head(&start, &name)?;
        self.entry(&address, offset)?;
        self.entry(&size, image.byte_size())?;
        self.entry(&width, image.width())?;
        self.entry(&height, image.height())?;
        self.entry(&stride, image.stride())?;
        self.entry(&depth, image.depth())?;
        self.head(&end, &name)
    }

    fn image(&mut self, image: &'a NamedBitmap) -> fmt::Result {
        match image.type_tag() {
            None => {
                self.blank()?;
                self.screen_block("", image, self.offset)?;
            }
            Some(tag) => self.types.entry(tag).or_default().push(Deferred {
                image,
                offset: self.offset,
            }),
        }

        let name = self.name(image.name());
        self.blank()?;
        self.head(START_HOTSPOTS, &name)?;
        for spot in image.hotspots() {
            self.hotspot(DEFINE_HOTSPOT, spot)?;
            self.groups.entry(spot.group.as_str()).or_default().push(spot);
        }
        self.head(END_HOTSPOTS, &name)?;

        self.blank()?;
        self.head(
            HOTSPOT_COUNT,
            format!("{name}, {}", image.hotspots().len()),
        )?;

        if !image.locations().is_empty() {
            self.blank()?;
            self.head(START_LOCATIONS, &name)?;
            for location in image.locations() {
                let args = format!(
                    "{}, {}, {}",
                    self.name(&location.name),
                    location.x,
                    location.y
                );
                self.entry(DEFINE_LOCATION, args)?;
            }
            self.head(END_LOCATIONS, &name)?;
        }

        if !image.areas().is_empty() {
            self.blank()?;
            self.head(START_AREAS, &name)?;
            for area in image.areas() {
                let args = format!(
                    "{}, {}, {}, {}, {}",
                    self.name(&area.name),
                    area.x,
                    area.y,
                    area.width,
                    area.height
                );
                self.entry(DEFINE_AREA, args)?;
            }
            self.head(END_AREAS, &name)?;
        }

        self.offset += image.byte_size();
        Ok(())
    }

    /// Writes the combined group table followed by one table per group
    /// under its own macro names. Nothing is written for a single group.
    fn groups(&mut self) -> fmt::Result {
        if self.groups.len() <= 1 {
            return Ok(());
        }
        let groups = std::mem::take(&mut self.groups);

        for (group, spots) in &groups {
            let name = self.name(group);
            self.blank()?;
            self.head(START_GROUP, &name)?;
            for spot in spots {
                self.hotspot(GROUP_HOTSPOT, spot)?;
            }
            self.head(END_GROUP, &name)?;
        }

        for (group, spots) in &groups {
            let suffix = macro_suffix(group);
            let start = format!("{START_GROUP}_{suffix}");
            let entry = format!("{GROUP_HOTSPOT}_{suffix}");
            let end = format!("{END_GROUP}_{suffix}");
            let name = self.name(group);

            self.blank()?;
            self.predefine(&start, 1)?;
            self.predefine(&entry, 6)?;
            self.predefine(&end, 1)?;

            self.blank()?;
            self.head(&start, &name)?;
            for spot in spots {
                self.hotspot(&entry, spot)?;
            }
            self.head(&end, &name)?;

            self.blank()?;
            self.undefine(&start)?;
            self.undefine(&entry)?;
            self.undefine(&end)?;
        }
        Ok(())
    }

    fn types(&mut self) -> fmt::Result {
        let types = std::mem::take(&mut self.types);
        for (tag, images) in &types {
            let suffix = format!("_{}", macro_suffix(tag));

            self.blank()?;
            for name in SCREEN_MACROS {
                self.predefine(&format!("{name}{suffix}"), 1)?;
            }
            for deferred in images {
                self.blank()?;
                self.screen_block(&suffix, deferred.image, deferred.offset)?;
            }
            self.blank()?;
            for name in SCREEN_MACROS {
                self.undefine(&format!("{name}{suffix}"))?;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<String, fmt::Error> {
        self.groups()?;
        self.types()?;

        self.blank()?;
        self.head(SCREEN_FILE_LENGTH, self.offset)?;

        self.blank()?;
        for (name, _) in BASE_MACROS {
            self.undefine(name)?;
        }
        Ok(self.out)
    }
}

/// Renders the header for `images`, in the order they were produced.
pub(crate) fn write_header(
    images: &[NamedBitmap],
    colors: &IndexMap<String, Color>,
    values: &[ShowValue],
    style: NameStyle,
) -> Result<String, fmt::Error> {
    let mut writer = HeaderWriter::new(style);
    writer.preamble()?;
    writer.colors(colors)?;
    writer.values(values)?;
    for image in images {
        writer.image(image)?;
    }
    writer.finish()
}
