//! screenc - A compiler for embedded device screens.
//!
//! Screens are described in XML as canvases of shapes, text, images and
//! reusable components. Each canvas is drawn and packed to its color depth;
//! the packed images form one binary file, described to firmware by a C
//! header of guarded macros.

pub mod config;

mod builder;
mod error;
mod export;
mod expr;
mod model;
mod session;
mod set_clause;
mod walker;

pub use screenc_core::{artifact, color, depth, draw, geometry};

pub use error::{AttributeContext, CompileError, ErrorCategory, ErrorKind, ScreenError};
pub use export::Export;
pub use expr::ExprError;

use std::{fs, path::Path};

use indexmap::IndexMap;
use log::{debug, info, trace};

use screenc_core::{
    artifact::{NamedBitmap, ShowValue},
    color::Color,
    draw::{Rasterizer, SoftwareRasterizer, TextMeasurer},
};

use config::AppConfig;
use session::CompileSession;

/// Everything one compiled document produced.
#[derive(Debug, Clone)]
pub struct Compilation {
    images: Vec<NamedBitmap>,
    colors: IndexMap<String, Color>,
    values: Vec<ShowValue>,
}

impl Compilation {
    /// Images in the order their canvases appear.
    pub fn images(&self) -> &[NamedBitmap] {
        &self.images
    }

    /// Declared colors in declaration order.
    pub fn colors(&self) -> &IndexMap<String, Color> {
        &self.colors
    }

    /// Every recorded value in document order.
    pub fn values(&self) -> &[ShowValue] {
        &self.values
    }
}

/// Builder for compiling screen documents and exporting the results.
///
/// Every compile runs in a fresh session, so one builder may compile any
/// number of documents without declarations leaking between them.
///
/// # Examples
///
/// ```rust,no_run
/// use screenc::{ScreenBuilder, config::AppConfig};
///
/// let source = r#"
///     <Screens>
///         <Canvas Name="Main" Width="10" Height="10" ColorDepth="Color24bpp">
///             <Rectangle Width="10" Height="10" Fill="Red" HotSpot="h1"/>
///         </Canvas>
///     </Screens>
/// "#;
///
/// let builder = ScreenBuilder::new(AppConfig::default());
/// let compilation = builder.compile(source).expect("Failed to compile");
/// let export = builder.export(&compilation).expect("Failed to export");
/// assert_eq!(export.binary.len(), 300);
/// ```
pub struct ScreenBuilder {
    config: AppConfig,
    rasterizer: Box<dyn Rasterizer>,
    measurer: Box<dyn TextMeasurer>,
}

impl Default for ScreenBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl ScreenBuilder {
    /// Create a new screen builder with the given configuration, drawing
    /// with the software rasterizer.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            rasterizer: Box::new(SoftwareRasterizer::new()),
            measurer: Box::new(SoftwareRasterizer::new()),
        }
    }

    /// Replaces the backend that paints primitives.
    pub fn with_rasterizer(mut self, rasterizer: impl Rasterizer + 'static) -> Self {
        self.rasterizer = Box::new(rasterizer);
        self
    }

    /// Replaces the backend that measures auto-sized text.
    pub fn with_text_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    /// Compile a screen document.
    ///
    /// `Image` sources are resolved against the working directory.
    ///
    /// # Errors
    ///
    /// Returns `ScreenError::Parse` when the document is not well formed and
    /// `ScreenError::Compile` for the first build or draw failure.
    pub fn compile(&self, source: &str) -> Result<Compilation, ScreenError> {
        self.compile_in(source, None)
    }

    /// Read and compile the document at `path`.
    ///
    /// `Image` sources are resolved against the document's directory.
    ///
    /// # Errors
    ///
    /// Returns `ScreenError::Io` when the file cannot be read, otherwise as
    /// [`ScreenBuilder::compile`].
    pub fn compile_path(&self, path: impl AsRef<Path>) -> Result<Compilation, ScreenError> {
        let path = path.as_ref();
        info!(path:? = path; "Reading screen document");
        let source = fs::read_to_string(path)?;
        self.compile_in(&source, path.parent())
    }

    fn compile_in(
        &self,
        source: &str,
        base_dir: Option<&Path>,
    ) -> Result<Compilation, ScreenError> {
        info!("Parsing screen document");
        let root = screenc_parser::parse_document(source)
            .map_err(|err| ScreenError::new_parse_error(err, source))?;
        debug!(root = root.tag(); "Document parsed successfully");

        let mut session = CompileSession::new(
            &self.config.compile,
            base_dir,
            self.rasterizer.as_ref(),
            self.measurer.as_ref(),
        );
        session
            .compile_document(&root)
            .map_err(|err| ScreenError::new_compile_error(err, source))?;

        let CompileSession {
            images,
            registries,
            values,
            ..
        } = session;
        info!(images = images.len(); "Document compiled");
        trace!(values:?; "Recorded values");

        Ok(Compilation {
            images,
            colors: registries.colors,
            values,
        })
    }

    /// Export a compilation as a binary screen file and its C header.
    ///
    /// # Errors
    ///
    /// Returns `ScreenError::Export` if the header cannot be formatted.
    pub fn export(&self, compilation: &Compilation) -> Result<Export, ScreenError> {
        export::export(
            &compilation.images,
            &compilation.colors,
            &compilation.values,
            self.config.export.name_style,
        )
    }
}
