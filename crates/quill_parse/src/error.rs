//! Parse errors.

use std::fmt;

use quill_diagnostic::{Diagnostic, ReportFrame};
use quill_ir::{Span, Token};
use quill_lexer::LexError;

/// A syntax error with the span of the offending token.
#[derive(Clone, Debug)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            span,
        }
    }

    /// "expected X, found Y" at the given token.
    pub fn unexpected(found: &Token, expected: &str) -> Self {
        ParseError::new(
            format!("expected {expected}, found {}", found.kind.describe()),
            found.span,
        )
    }

    pub fn from_lex(err: LexError) -> Self {
        ParseError::new(err.to_string(), err.span)
    }

    /// Convert to a renderable diagnostic.
    pub fn to_diagnostic(&self, filename: &str, source: &str) -> Diagnostic {
        Diagnostic::error("SyntaxError", &self.message)
            .with_frame(ReportFrame::new(self.span, filename, source))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error: {} at {}", self.message, self.span)
    }
}

impl std::error::Error for ParseError {}
