//! Diagnostic model and terminal rendering.
//!
//! Lex, parse and runtime errors all funnel into [`Diagnostic`] before
//! being shown to the user. Spans carry byte offsets only; line and
//! column are recomputed here by scanning the source text, so the rest
//! of the pipeline never tracks positions.

mod render;

pub use render::{line_col, ColorMode, Renderer};

use quill_ir::Span;

/// Severity of a diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
            Severity::Note => f.write_str("note"),
        }
    }
}

/// One source location attached to a diagnostic.
///
/// Each frame carries its own filename and source text because an error
/// can unwind through nested evaluation contexts (imports, nested eval)
/// that originate from different sources. Frames are ordered innermost
/// first.
#[derive(Clone, Debug)]
pub struct ReportFrame {
    pub span: Span,
    pub filename: String,
    pub source: String,
    /// Optional context note, e.g. `in function 'f'`.
    pub context: Option<String>,
}

impl ReportFrame {
    pub fn new(span: Span, filename: impl Into<String>, source: impl Into<String>) -> Self {
        ReportFrame {
            span,
            filename: filename.into(),
            source: source.into(),
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// A renderable diagnostic: class name, message, and source frames.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Error class name shown in brackets, e.g. `NameError`.
    pub name: String,
    pub message: String,
    /// Source locations, innermost first.
    pub frames: Vec<ReportFrame>,
}

impl Diagnostic {
    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            name: name.into(),
            message: message.into(),
            frames: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_frame(mut self, frame: ReportFrame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Render to a string with the given color mode.
    pub fn render(&self, colors: ColorMode, is_tty: bool) -> String {
        Renderer::new(colors, is_tty).render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_accumulate_in_order() {
        let d = Diagnostic::error("TypeError", "boom")
            .with_frame(ReportFrame::new(Span::new(0, 1), "a.ql", "x"))
            .with_frame(ReportFrame::new(Span::new(2, 3), "b.ql", "y;z"));
        assert_eq!(d.frames.len(), 2);
        assert_eq!(d.frames[0].filename, "a.ql");
    }
}
