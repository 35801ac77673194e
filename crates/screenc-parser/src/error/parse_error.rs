//! The error returned when a document cannot be loaded.

use std::fmt;

use crate::error::Diagnostic;

/// One or more diagnostics that prevented loading.
#[derive(Debug, Clone)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{first}")?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(vec![diagnostic])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_display_counts_extra_diagnostics() {
        let err = ParseError::new(vec![
            Diagnostic::error("first").with_code(ErrorCode::E002),
            Diagnostic::error("second"),
        ]);
        assert_eq!(err.to_string(), "error[E002]: first (+1 more)");
    }

    #[test]
    fn test_from_single_diagnostic() {
        let err: ParseError = Diagnostic::error("only").into();
        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.to_string(), "error: only");
    }
}
