//! Diagnostics for documents that fail to load.
//!
//! Every problem becomes a [`Diagnostic`] carrying an [`ErrorCode`], labeled
//! source spans and optional help text. A failed load returns all of them
//! together in a [`ParseError`].

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
