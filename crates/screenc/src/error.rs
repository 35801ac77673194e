//! Error types for screenc operations.
//!
//! [`ScreenError`] is the error returned by the public API. Problems found
//! while building or drawing a document are [`CompileError`]s, which carry
//! the source line of the element that failed.

mod compile;

use std::{fmt, io};

use thiserror::Error;

use screenc_parser::error::ParseError;

pub use compile::{AttributeContext, CompileError, ErrorCategory, ErrorKind};

/// The main error type for screenc operations.
///
/// The `Parse` and `Compile` variants keep the document text so callers can
/// render the offending snippet.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("{err}")]
    Compile { err: CompileError, src: String },

    #[error("Export error: failed to format header")]
    Export(#[from] fmt::Error),
}

impl ScreenError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }

    /// Create a new `Compile` error with the associated source code.
    pub fn new_compile_error(err: CompileError, src: impl Into<String>) -> Self {
        Self::Compile {
            err,
            src: src.into(),
        }
    }
}
