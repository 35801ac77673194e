//! State scoped to one document compile.
//!
//! A [`CompileSession`] owns the element arena, the expression environment
//! and the component, font and color registries. Nothing outlives it, so two
//! compiles never observe each other's declarations.

use std::path::Path;

use indexmap::IndexMap;

use screenc_core::{
    artifact::{NamedBitmap, ShowValue},
    color::Color,
    draw::{FontSpec, Rasterizer, TextMeasurer},
};

use crate::{
    config::{CompileConfig, SetTargetPolicy},
    expr::Environment,
    model::{AttrScope, ElementId, Tree},
};

/// Document-wide compile settings. Root attributes may override the
/// configured multiples.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Settings {
    pub stride_multiple: i32,
    pub width_multiple: i32,
    pub set_targets: SetTargetPolicy,
}

impl From<&CompileConfig> for Settings {
    fn from(config: &CompileConfig) -> Self {
        Self {
            stride_multiple: config.stride_multiple.max(1),
            width_multiple: config.width_multiple.max(1),
            set_targets: config.set_targets,
        }
    }
}

/// Named declarations visible to attribute values.
#[derive(Debug, Default)]
pub(crate) struct Registries {
    pub env: Environment,
    /// Component templates by name. Templates are never drawn.
    pub components: IndexMap<String, ElementId>,
    pub fonts: IndexMap<String, FontSpec>,
    pub colors: IndexMap<String, Color>,
}

impl Registries {
    pub(crate) fn scope<'a>(&'a self, base_dir: Option<&'a Path>) -> AttrScope<'a> {
        AttrScope {
            env: &self.env,
            colors: &self.colors,
            fonts: &self.fonts,
            base_dir,
        }
    }
}

pub(crate) struct CompileSession<'a> {
    pub settings: Settings,
    pub tree: Tree,
    pub registries: Registries,
    /// Every recorded value in document order.
    pub values: Vec<ShowValue>,
    pub images: Vec<NamedBitmap>,
    pub base_dir: Option<&'a Path>,
    pub rasterizer: &'a dyn Rasterizer,
    pub measurer: &'a dyn TextMeasurer,
}

impl<'a> CompileSession<'a> {
    pub(crate) fn new(
        config: &CompileConfig,
        base_dir: Option<&'a Path>,
        rasterizer: &'a dyn Rasterizer,
        measurer: &'a dyn TextMeasurer,
    ) -> Self {
        Self {
            settings: Settings::from(config),
            tree: Tree::new(),
            registries: Registries::default(),
            values: Vec::new(),
            images: Vec::new(),
            base_dir,
            rasterizer,
            measurer,
        }
    }
}
