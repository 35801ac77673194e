use std::fmt;

use thiserror::Error;

use screenc_core::{color::ColorError, depth::UnknownColorDepth, draw::FontError};
use screenc_parser::Span;

use crate::expr::ExprError;

/// The phase a compile problem belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Build,
    Layout,
    Evaluation,
    Export,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Build => "build",
            Self::Layout => "layout",
            Self::Evaluation => "evaluation",
            Self::Export => "export",
        };
        f.write_str(name)
    }
}

/// What went wrong, without the source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("Unknown attribute name '{0}'")]
    UnknownAttribute(String),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error(transparent)]
    Font(#[from] FontError),

    #[error(transparent)]
    ColorDepth(#[from] UnknownColorDepth),

    #[error("{0} element must have a name.")]
    UnnamedDeclaration(&'static str),

    #[error("No font named '{0}' was found.")]
    UnknownFont(String),

    #[error("No component named '{0}' was found.")]
    UnknownComponent(String),

    #[error("A component named '{0}' is already defined.")]
    DuplicateComponent(String),

    #[error("Component must have a name.")]
    UnnamedComponent,

    #[error("Name property must be set before setting Value.")]
    ValueWithoutName,

    #[error("ShowValue '{0}' has no value to show.")]
    ShowValueWithoutValue(String),

    #[error("Canvas must set exactly one of Width or ItemWidth.")]
    CanvasWidth,

    #[error("{attribute} must be a positive power of two, not '{value}'")]
    InvalidMultiple { attribute: String, value: String },

    #[error("Invalid {keyword} expression: '{text}'")]
    InvalidSet { keyword: &'static str, text: String },

    #[error("{keyword} can't find an element named '{name}'")]
    SetTargetNotFound { keyword: &'static str, name: String },

    #[error("Image element has no Source.")]
    MissingImageSource,

    #[error("Unable to load image '{path}': {reason}")]
    Image { path: String, reason: String },

    #[error("Row must be within Grid")]
    RowOutsideGrid,

    #[error("Ellipse height and width must be even so center falls on an even pixel")]
    OddEllipse,

    #[error("Canvas with ItemWidth may only contain Item elements, found '{0}'")]
    NonItemChild(String),

    #[error("Canvas with ItemWidth has no Item elements.")]
    MissingItems,

    #[error("HotSpot element must have name.")]
    UnnamedHotSpot,

    #[error(transparent)]
    Expression(#[from] ExprError),

    #[error("ColorDepth property of canvas '{canvas}' has invalid value '{value}'")]
    InvalidColorDepth { canvas: String, value: String },
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownAttribute(_)
            | Self::Color(_)
            | Self::Font(_)
            | Self::ColorDepth(_)
            | Self::UnnamedDeclaration(_)
            | Self::UnknownFont(_)
            | Self::UnknownComponent(_)
            | Self::DuplicateComponent(_)
            | Self::UnnamedComponent
            | Self::ValueWithoutName
            | Self::ShowValueWithoutValue(_)
            | Self::CanvasWidth
            | Self::InvalidMultiple { .. }
            | Self::InvalidSet { .. }
            | Self::SetTargetNotFound { .. }
            | Self::MissingImageSource
            | Self::Image { .. } => ErrorCategory::Build,
            Self::RowOutsideGrid
            | Self::OddEllipse
            | Self::NonItemChild(_)
            | Self::MissingItems
            | Self::UnnamedHotSpot => ErrorCategory::Layout,
            Self::Expression(_) => ErrorCategory::Evaluation,
            Self::InvalidColorDepth { .. } => ErrorCategory::Export,
        }
    }
}

/// The attribute being applied when an error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeContext {
    pub name: String,
    pub value: String,
}

/// A compile failure, optionally tagged with where it happened.
///
/// Errors start out `Raw` and gain a position the first time they cross an
/// element boundary. Wrapping a `Wrapped` error returns it unchanged, so the
/// innermost element is the one reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("{0}")]
    Raw(ErrorKind),

    #[error("Error at line {line}{}:\n{kind}", attribute_suffix(.attribute))]
    Wrapped {
        line: usize,
        span: Span,
        attribute: Option<AttributeContext>,
        kind: ErrorKind,
    },
}

fn attribute_suffix(attribute: &Option<AttributeContext>) -> String {
    attribute
        .as_ref()
        .map(|a| format!(" setting attribute '{}' to '{}'", a.name, a.value))
        .unwrap_or_default()
}

impl CompileError {
    /// Attaches a source position unless one is already present.
    pub fn wrap(self, line: usize, span: Span, attribute: Option<AttributeContext>) -> Self {
        match self {
            Self::Raw(kind) => Self::Wrapped {
                line,
                span,
                attribute,
                kind,
            },
            wrapped @ Self::Wrapped { .. } => wrapped,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        match self {
            Self::Raw(kind) | Self::Wrapped { kind, .. } => kind,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind().category()
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, Self::Wrapped { .. })
    }

    /// Returns the span of the offending start tag, or of the attribute
    /// value when the error happened while applying one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Raw(_) => None,
            Self::Wrapped { span, .. } => Some(*span),
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Raw(_) => None,
            Self::Wrapped { line, .. } => Some(*line),
        }
    }
}

impl From<ErrorKind> for CompileError {
    fn from(kind: ErrorKind) -> Self {
        Self::Raw(kind)
    }
}

impl From<ExprError> for CompileError {
    fn from(err: ExprError) -> Self {
        Self::Raw(err.into())
    }
}

impl From<ColorError> for CompileError {
    fn from(err: ColorError) -> Self {
        Self::Raw(err.into())
    }
}
