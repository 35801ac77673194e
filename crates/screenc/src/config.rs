use serde::Deserialize;

/// Application configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Compile configuration section
    #[serde(default)]
    pub compile: CompileConfig,

    /// Export configuration section
    #[serde(default)]
    pub export: ExportConfig,
}

/// Compile configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Row stride of every canvas is rounded up to this many pixels.
    pub stride_multiple: i32,

    /// Canvas widths are rounded up to this many pixels.
    pub width_multiple: i32,

    /// Which named elements a `Set` assignment reaches.
    pub set_targets: SetTargetPolicy,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            stride_multiple: 1,
            width_multiple: 1,
            set_targets: SetTargetPolicy::default(),
        }
    }
}

/// How `Set` and `SetString` resolve a target name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetTargetPolicy {
    /// Assign to every element with the name below the `Set`'s parent.
    #[default]
    AllMatches,
    /// Assign only to the first such element in document order.
    FirstMatch,
}

/// Export configuration section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub name_style: NameStyle,
}

/// How names appear in emitted macro arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameStyle {
    /// C string literals: `DEFINE_HOTSPOT("ok", "", ...)`.
    #[default]
    Quoted,
    /// Bare tokens: `DEFINE_HOTSPOT(ok, , ...)`.
    Identifier,
}
