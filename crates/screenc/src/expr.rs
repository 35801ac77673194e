//! Attribute expressions.
//!
//! Numeric attributes accept integer arithmetic over named variables
//! (`a + 5`, `(Title.Width - 4) / 2`); string contexts additionally accept
//! string literals joined with `+`. Variables live in a flat [`Environment`]
//! shared by the whole compile.

mod environment;
mod eval;
mod parser;
mod value;

pub use environment::Environment;
pub use value::Value;

pub(crate) use eval::{eval_int, eval_string};

use thiserror::Error;

/// A failure to parse or evaluate an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("could not evaluate expression: '{expr}': expected {expected} at offset {offset}")]
    Syntax {
        expr: String,
        expected: String,
        offset: usize,
    },

    #[error("could not evaluate expression: '{expr}': undefined variable '{name}'")]
    UndefinedVariable { expr: String, name: String },

    #[error("could not evaluate expression: '{expr}': {message}")]
    Type { expr: String, message: String },

    #[error("could not evaluate expression: '{expr}': integer overflow")]
    Overflow { expr: String },

    #[error("could not evaluate expression: '{expr}': division by zero")]
    DivisionByZero { expr: String },
}
