//! Error codes for source loading diagnostics.
//!
//! Codes are grouped by the stage that reports them:
//! - `E0xx` - markup scanning (characters, quoting, entities)
//! - `E1xx` - element structure (nesting, roots, end of input)

use std::fmt;

/// Stable identifiers for loader diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Scanning Errors (E0xx)
    // =========================================================================
    /// A quoted value, comment, CDATA section or processing instruction was
    /// opened but never closed.
    E001,

    /// A character that cannot start or continue the current construct.
    E002,

    /// An entity or character reference that is unknown or malformed.
    ///
    /// Recognized forms are `&lt;`, `&gt;`, `&amp;`, `&apos;`, `&quot;`,
    /// `&#NNN;` and `&#xHHH;`.
    E003,

    // =========================================================================
    // Structure Errors (E1xx)
    // =========================================================================
    /// Markup in a place where it is not allowed, such as a second root
    /// element or a closing tag with nothing open.
    E100,

    /// The input ended before the document was complete.
    E101,

    /// A closing tag whose name differs from the innermost open element.
    E102,
}

impl ErrorCode {
    /// Returns the code as written in reports, e.g. `"E001"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
        }
    }

    /// Returns a short label describing the code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid entity reference",
            ErrorCode::E100 => "unexpected markup",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E102 => "mismatched closing tag",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E102.to_string(), "E102");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E003.description(), "invalid entity reference");
        assert_eq!(ErrorCode::E101.description(), "incomplete input");
    }
}
