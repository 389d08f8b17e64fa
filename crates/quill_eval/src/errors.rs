//! The typed error taxonomy and its factory functions.
//!
//! Every runtime failure is a [`RuntimeError`] with a closed
//! [`ErrorKind`], a message, an optional attached value (the payload of
//! `raise`), and a trace of source frames accumulated innermost-first as
//! the error unwinds.

use std::fmt;
use std::rc::Rc;

use quill_diagnostic::{Diagnostic, ReportFrame};
use quill_ir::Span;

use crate::value::Value;

/// Closed set of user-catchable error classes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorKind {
    NameError,
    ValueError,
    TypeError,
    AttributeError,
    KeyError,
    IndexError,
    SyntaxError,
    ImportError,
    VersionConflict,
    AssertionError,
    ScopeError,
    /// Call depth exceeded the interpreter's ceiling.
    RecursionError,
    /// `raise` with a non-error payload.
    Raised,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::NameError => "NameError",
            ErrorKind::ValueError => "ValueError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::AttributeError => "AttributeError",
            ErrorKind::KeyError => "KeyError",
            ErrorKind::IndexError => "IndexError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::ImportError => "ImportError",
            ErrorKind::VersionConflict => "VersionConflict",
            ErrorKind::AssertionError => "AssertionError",
            ErrorKind::ScopeError => "ScopeError",
            ErrorKind::RecursionError => "RecursionError",
            ErrorKind::Raised => "Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One source location collected while an error unwinds.
///
/// Frames carry their own filename and source because errors can cross
/// nested-eval boundaries into differently-sourced interpreters.
#[derive(Clone, Debug)]
pub struct TraceFrame {
    pub span: Span,
    pub filename: Rc<str>,
    pub source: Rc<str>,
    /// e.g. `in function 'f'`.
    pub context: Option<String>,
}

/// A typed runtime error.
#[derive(Clone, Debug)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    /// The value attached by `raise`, if any.
    pub payload: Option<Value>,
    /// Source frames, innermost first.
    pub trace: Vec<TraceFrame>,
}

/// Frames past this count are dropped; runaway recursion would otherwise
/// make reports unreadable.
const MAX_TRACE_FRAMES: usize = 32;

impl RuntimeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        RuntimeError {
            kind,
            message: message.into(),
            payload: None,
            trace: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Record an unwind location. No-op once the trace is full.
    pub fn push_frame(&mut self, frame: TraceFrame) {
        if self.trace.len() < MAX_TRACE_FRAMES {
            self.trace.push(frame);
        }
    }

    /// Whether any frame has been recorded yet.
    pub fn has_location(&self) -> bool {
        !self.trace.is_empty()
    }

    /// Convert into a renderable diagnostic, frames innermost first.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diagnostic = Diagnostic::error(self.kind.name(), &self.message);
        for frame in &self.trace {
            let mut report =
                ReportFrame::new(frame.span, frame.filename.as_ref(), frame.source.as_ref());
            if let Some(context) = &frame.context {
                report = report.with_context(context.clone());
            }
            diagnostic = diagnostic.with_frame(report);
        }
        diagnostic
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for RuntimeError {}

// Factory functions. Kept together so every error message lives in one
// place; all are `#[cold]` since errors are off the hot path.

#[cold]
pub fn undefined_name(name: &str) -> RuntimeError {
    RuntimeError::new(ErrorKind::NameError, format!("name '{name}' is not defined"))
}

#[cold]
pub fn assign_undeclared(name: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::NameError,
        format!("cannot assign to undeclared name '{name}' (declare it with 'pub' or 'priv')"),
    )
}

#[cold]
pub fn cannot_delete(name: &str) -> RuntimeError {
    RuntimeError::new(ErrorKind::NameError, format!("cannot delete '{name}'"))
}

#[cold]
pub fn type_error(message: impl Into<String>) -> RuntimeError {
    RuntimeError::new(ErrorKind::TypeError, message)
}

#[cold]
pub fn value_error(message: impl Into<String>) -> RuntimeError {
    RuntimeError::new(ErrorKind::ValueError, message)
}

#[cold]
pub fn spec_not_defined(spec: &str, type_name: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::TypeError,
        format!("'{spec}' is not defined for type {type_name}"),
    )
}

#[cold]
pub fn not_callable(type_name: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::TypeError,
        format!("{type_name} is not callable"),
    )
}

#[cold]
pub fn no_attribute(type_name: &str, attr: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::AttributeError,
        format!("{type_name} has no attribute '{attr}'"),
    )
}

#[cold]
pub fn key_not_found(key: &str) -> RuntimeError {
    RuntimeError::new(ErrorKind::KeyError, format!("key not found: {key}"))
}

#[cold]
pub fn index_out_of_bounds(index: f64, len: usize) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::IndexError,
        format!("index {index} out of bounds for length {len}"),
    )
}

#[cold]
pub fn unhashable(type_name: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::TypeError,
        format!("{type_name} is not hashable"),
    )
}

#[cold]
pub fn extra_positional(func: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::TypeError,
        format!("extra positional argument passed to {func}"),
    )
}

#[cold]
pub fn extra_keyword(func: &str, name: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::TypeError,
        format!("unexpected keyword argument '{name}' passed to {func}"),
    )
}

#[cold]
pub fn argument_not_passed(func: &str, param: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::TypeError,
        format!("required argument '{param}' not passed to {func}"),
    )
}

#[cold]
pub fn keyword_for_positional_only(func: &str, param: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::TypeError,
        format!("parameter '{param}' of {func} is positional-only"),
    )
}

#[cold]
pub fn module_not_found(name: &str) -> RuntimeError {
    RuntimeError::new(ErrorKind::ImportError, format!("module '{name}' not found"))
}

#[cold]
pub fn module_invalid(name: &str, detail: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::ImportError,
        format!("module '{name}' is invalid: {detail}"),
    )
}

#[cold]
pub fn remote_imports_unsupported(name: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::ImportError,
        format!("remote imports are not supported: '{name}'"),
    )
}

#[cold]
pub fn version_conflict(required: &str, actual: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::VersionConflict,
        format!("requires interpreter version {required}, but this is {actual}"),
    )
}

#[cold]
pub fn assertion_failed(message: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::AssertionError,
        format!("assertion failed: {message}"),
    )
}

#[cold]
pub fn scope_error(message: impl Into<String>) -> RuntimeError {
    RuntimeError::new(ErrorKind::ScopeError, message)
}

#[cold]
pub fn recursion_limit(depth: usize) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::RecursionError,
        format!("maximum call depth exceeded (limit: {depth})"),
    )
}

#[cold]
pub fn control_outside(what: &str, context: &str) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::SyntaxError,
        format!("'{what}' used outside of a {context}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_render_their_names() {
        assert_eq!(ErrorKind::NameError.to_string(), "NameError");
        assert_eq!(ErrorKind::VersionConflict.to_string(), "VersionConflict");
    }

    #[test]
    fn trace_is_capped() {
        let mut err = type_error("x");
        for i in 0..100 {
            err.push_frame(TraceFrame {
                span: Span::point(i),
                filename: "f".into(),
                source: "s".into(),
                context: None,
            });
        }
        assert_eq!(err.trace.len(), MAX_TRACE_FRAMES);
    }

    #[test]
    fn diagnostic_carries_kind_and_frames() {
        let mut err = undefined_name("x");
        err.push_frame(TraceFrame {
            span: Span::new(0, 1),
            filename: "a.ql".into(),
            source: "x;".into(),
            context: Some("at top level".into()),
        });
        let d = err.to_diagnostic();
        assert_eq!(d.name, "NameError");
        assert_eq!(d.frames.len(), 1);
    }
}
