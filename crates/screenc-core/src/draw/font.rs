//! Font attributes and monospace glyph selection.
//!
//! A [`FontSpec`] records the font attributes an author set on a `TextBlock`
//! or a named `Font` declaration. Every field is optional so one spec can be
//! layered over another with [`FontSpec::merge_from`].
//!
//! The software backend renders with the fixed bitmap fonts shipped with
//! `embedded-graphics`; [`FontSpec::mono_font`] picks the closest one for a
//! requested size, weight and style. The family and stretch are recorded but
//! do not influence glyph choice.

use std::str::FromStr;

use embedded_graphics::mono_font::{MonoFont, ascii};
use thiserror::Error;

/// Default font size in pixels when none is set.
pub const DEFAULT_FONT_SIZE: i32 = 12;

/// Error for an unrecognized font attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {attribute} '{value}'")]
pub struct FontError {
    attribute: &'static str,
    value: String,
}

impl FontError {
    fn new(attribute: &'static str, value: &str) -> Self {
        Self {
            attribute,
            value: value.to_string(),
        }
    }
}

/// Font weight names, from lightest to heaviest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontWeight {
    Thin,
    ExtraLight,
    Light,
    Normal,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
    ExtraBlack,
}

impl FontWeight {
    pub fn is_bold(self) -> bool {
        self >= FontWeight::SemiBold
    }
}

impl FromStr for FontWeight {
    type Err = FontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Thin" => FontWeight::Thin,
            "ExtraLight" | "UltraLight" => FontWeight::ExtraLight,
            "Light" => FontWeight::Light,
            "Normal" | "Regular" => FontWeight::Normal,
            "Medium" => FontWeight::Medium,
            "SemiBold" | "DemiBold" => FontWeight::SemiBold,
            "Bold" => FontWeight::Bold,
            "ExtraBold" | "UltraBold" => FontWeight::ExtraBold,
            "Black" | "Heavy" => FontWeight::Black,
            "ExtraBlack" | "UltraBlack" => FontWeight::ExtraBlack,
            other => return Err(FontError::new("FontWeight", other)),
        })
    }
}

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

impl FromStr for FontStyle {
    type Err = FontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Normal" => Ok(FontStyle::Normal),
            "Italic" => Ok(FontStyle::Italic),
            "Oblique" => Ok(FontStyle::Oblique),
            other => Err(FontError::new("FontStyle", other)),
        }
    }
}

/// Horizontal font stretch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontStretch {
    UltraCondensed,
    ExtraCondensed,
    Condensed,
    SemiCondensed,
    Normal,
    SemiExpanded,
    Expanded,
    ExtraExpanded,
    UltraExpanded,
}

impl FromStr for FontStretch {
    type Err = FontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "UltraCondensed" => FontStretch::UltraCondensed,
            "ExtraCondensed" => FontStretch::ExtraCondensed,
            "Condensed" => FontStretch::Condensed,
            "SemiCondensed" => FontStretch::SemiCondensed,
            "Normal" | "Medium" => FontStretch::Normal,
            "SemiExpanded" => FontStretch::SemiExpanded,
            "Expanded" => FontStretch::Expanded,
            "ExtraExpanded" => FontStretch::ExtraExpanded,
            "UltraExpanded" => FontStretch::UltraExpanded,
            other => return Err(FontError::new("FontStretch", other)),
        })
    }
}

/// A partially specified font.
///
/// # Examples
///
/// ```
/// # use screenc_core::draw::{FontSpec, FontWeight};
/// let mut heading = FontSpec::default();
/// heading.set_size(20);
/// heading.set_weight(FontWeight::Bold);
///
/// let mut label = FontSpec::default();
/// label.set_family("Segoe UI");
/// label.merge_from(&heading);
///
/// assert_eq!(label.size(), 20);
/// assert_eq!(label.family(), Some("Segoe UI"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontSpec {
    family: Option<String>,
    size: Option<i32>,
    weight: Option<FontWeight>,
    style: Option<FontStyle>,
    stretch: Option<FontStretch>,
}

impl FontSpec {
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    /// Returns the size in pixels, or [`DEFAULT_FONT_SIZE`] when unset.
    pub fn size(&self) -> i32 {
        self.size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn weight(&self) -> FontWeight {
        self.weight.unwrap_or(FontWeight::Normal)
    }

    pub fn style(&self) -> FontStyle {
        self.style.unwrap_or(FontStyle::Normal)
    }

    pub fn stretch(&self) -> FontStretch {
        self.stretch.unwrap_or(FontStretch::Normal)
    }

    pub fn set_family(&mut self, family: impl Into<String>) {
        self.family = Some(family.into());
    }

    pub fn set_size(&mut self, size: i32) {
        self.size = Some(size);
    }

    pub fn set_weight(&mut self, weight: FontWeight) {
        self.weight = Some(weight);
    }

    pub fn set_style(&mut self, style: FontStyle) {
        self.style = Some(style);
    }

    pub fn set_stretch(&mut self, stretch: FontStretch) {
        self.stretch = Some(stretch);
    }

    /// Copies every field that `other` has set, leaving the rest untouched.
    ///
    /// A size of zero counts as unset.
    pub fn merge_from(&mut self, other: &FontSpec) {
        if let Some(family) = &other.family {
            self.family = Some(family.clone());
        }
        if let Some(size) = other.size.filter(|size| *size != 0) {
            self.size = Some(size);
        }
        if other.weight.is_some() {
            self.weight = other.weight;
        }
        if other.style.is_some() {
            self.style = other.style;
        }
        if other.stretch.is_some() {
            self.stretch = other.stretch;
        }
    }

    /// Picks the bitmap font that best matches this spec.
    ///
    /// The tallest glyph set not exceeding [`FontSpec::size`] wins; when every
    /// candidate is taller, the smallest one is used. Bold and italic sets are
    /// preferred when requested and available.
    pub fn mono_font(&self) -> &'static MonoFont<'static> {
        let bold = self.weight().is_bold();
        let italic = self.style() != FontStyle::Normal;
        let wanted = self.size();

        let preferred: Vec<&MonoCandidate> = MONO_FONTS
            .iter()
            .filter(|c| c.bold == bold && c.italic == italic)
            .collect();
        let pool: Vec<&MonoCandidate> = if preferred.is_empty() {
            MONO_FONTS.iter().filter(|c| !c.bold && !c.italic).collect()
        } else {
            preferred
        };

        pool.iter()
            .filter(|c| c.height <= wanted)
            .max_by_key(|c| c.height)
            .or_else(|| pool.iter().min_by_key(|c| c.height))
            .map(|c| c.font)
            .unwrap_or(&ascii::FONT_6X10)
    }
}

struct MonoCandidate {
    font: &'static MonoFont<'static>,
    height: i32,
    bold: bool,
    italic: bool,
}

const fn regular(font: &'static MonoFont<'static>, height: i32) -> MonoCandidate {
    MonoCandidate {
        font,
        height,
        bold: false,
        italic: false,
    }
}

const MONO_FONTS: &[MonoCandidate] = &[
    regular(&ascii::FONT_4X6, 6),
    regular(&ascii::FONT_5X7, 7),
    regular(&ascii::FONT_5X8, 8),
    regular(&ascii::FONT_6X9, 9),
    regular(&ascii::FONT_6X10, 10),
    regular(&ascii::FONT_6X12, 12),
    regular(&ascii::FONT_7X13, 13),
    regular(&ascii::FONT_7X14, 14),
    regular(&ascii::FONT_9X15, 15),
    regular(&ascii::FONT_9X18, 18),
    regular(&ascii::FONT_10X20, 20),
    MonoCandidate {
        font: &ascii::FONT_6X13_BOLD,
        height: 13,
        bold: true,
        italic: false,
    },
    MonoCandidate {
        font: &ascii::FONT_7X14_BOLD,
        height: 14,
        bold: true,
        italic: false,
    },
    MonoCandidate {
        font: &ascii::FONT_9X15_BOLD,
        height: 15,
        bold: true,
        italic: false,
    },
    MonoCandidate {
        font: &ascii::FONT_9X18_BOLD,
        height: 18,
        bold: true,
        italic: false,
    },
    MonoCandidate {
        font: &ascii::FONT_6X13_ITALIC,
        height: 13,
        bold: false,
        italic: true,
    },
    MonoCandidate {
        font: &ascii::FONT_8X13_ITALIC,
        height: 13,
        bold: false,
        italic: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_names() {
        assert_eq!("Bold".parse::<FontWeight>(), Ok(FontWeight::Bold));
        assert_eq!("DemiBold".parse::<FontWeight>(), Ok(FontWeight::SemiBold));
        assert!("Chunky".parse::<FontWeight>().is_err());
        assert!(FontWeight::Bold.is_bold());
        assert!(!FontWeight::Medium.is_bold());
    }

    #[test]
    fn test_invalid_value_message() {
        let err = "Slanted".parse::<FontStyle>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid FontStyle 'Slanted'");
    }

    #[test]
    fn test_merge_skips_unset_fields() {
        let mut base = FontSpec::default();
        base.set_family("Arial");
        base.set_size(10);

        let mut overlay = FontSpec::default();
        overlay.set_style(FontStyle::Italic);
        overlay.set_size(0);

        base.merge_from(&overlay);
        assert_eq!(base.family(), Some("Arial"));
        assert_eq!(base.size(), 10);
        assert_eq!(base.style(), FontStyle::Italic);
    }

    #[test]
    fn test_mono_font_selection() {
        let mut spec = FontSpec::default();
        spec.set_size(20);
        assert_eq!(spec.mono_font().character_size.height, 20);

        spec.set_size(3);
        assert_eq!(spec.mono_font().character_size.height, 6);

        spec.set_size(16);
        spec.set_weight(FontWeight::Bold);
        assert_eq!(spec.mono_font().character_size.height, 15);
    }
}
