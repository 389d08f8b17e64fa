//! Terminal rendering with ANSI colors and caret underlines.

use std::fmt::Write as _;

use crate::{Diagnostic, Severity};

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const LOCUS: &str = "\x1b[1;34m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

/// Color selection for rendered output.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum ColorMode {
    /// Colors iff the output is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Compute the 1-based line and column of a byte offset.
///
/// Scans the source from the start; diagnostics are rare enough that the
/// scan never matters.
pub fn line_col(source: &str, offset: u32) -> (usize, usize) {
    let offset = (offset as usize).min(source.len());
    let mut line = 1;
    let mut line_start = 0;
    for (i, b) in source.bytes().enumerate() {
        if i >= offset {
            break;
        }
        if b == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    (line, offset - line_start + 1)
}

/// The text of a 1-based line, without its newline.
fn line_text(source: &str, line: usize) -> &str {
    source.lines().nth(line - 1).unwrap_or("")
}

/// Renders diagnostics to strings.
pub struct Renderer {
    colors: bool,
}

impl Renderer {
    pub fn new(mode: ColorMode, is_tty: bool) -> Self {
        Renderer {
            colors: mode.enabled(is_tty),
        }
    }

    fn severity_color(&self, severity: Severity) -> &'static str {
        if !self.colors {
            return "";
        }
        match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
        }
    }

    fn paint(&self, code: &'static str) -> &'static str {
        if self.colors {
            code
        } else {
            ""
        }
    }

    /// Render a full diagnostic: header line plus one snippet per frame,
    /// innermost first.
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        let sev = self.severity_color(diagnostic.severity);
        let bold = self.paint(colors::BOLD);
        let reset = self.paint(colors::RESET);
        let _ = writeln!(
            out,
            "{sev}{}[{}]{reset}{bold}: {}{reset}",
            diagnostic.severity, diagnostic.name, diagnostic.message
        );
        for frame in &diagnostic.frames {
            self.render_frame(&mut out, frame);
        }
        out
    }

    fn render_frame(&self, out: &mut String, frame: &crate::ReportFrame) {
        let locus = self.paint(colors::LOCUS);
        let reset = self.paint(colors::RESET);
        let (line, col) = line_col(&frame.source, frame.span.start);
        let _ = writeln!(
            out,
            "  {locus}-->{reset} {}:{line}:{col}",
            frame.filename
        );

        let text = line_text(&frame.source, line);
        let gutter = line.to_string();
        let pad = " ".repeat(gutter.len());
        let _ = writeln!(out, "{pad} {locus}|{reset}");
        let _ = writeln!(out, "{gutter} {locus}|{reset} {text}");

        // Caret line: underline the span, clamped to the offending line.
        let underline_len = (frame.span.len() as usize).clamp(1, text.len().saturating_sub(col - 1).max(1));
        let caret = "^".repeat(underline_len);
        let sev = self.severity_color(Severity::Error);
        let _ = writeln!(
            out,
            "{pad} {locus}|{reset} {}{sev}{caret}{reset}",
            " ".repeat(col - 1)
        );

        if let Some(context) = &frame.context {
            let _ = writeln!(out, "{pad} {locus}={reset} {context}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportFrame;
    use pretty_assertions::assert_eq;
    use quill_ir::Span;

    #[test]
    fn line_col_first_line() {
        assert_eq!(line_col("abc", 0), (1, 1));
        assert_eq!(line_col("abc", 2), (1, 3));
    }

    #[test]
    fn line_col_after_newlines() {
        let src = "one\ntwo\nthree";
        assert_eq!(line_col(src, 4), (2, 1));
        assert_eq!(line_col(src, 9), (3, 2));
    }

    #[test]
    fn line_col_clamps_past_end() {
        assert_eq!(line_col("ab", 99), (1, 3));
    }

    #[test]
    fn renders_caret_under_span() {
        let src = "pub y = x + 2;";
        let d = Diagnostic::error("NameError", "name 'x' is not defined")
            .with_frame(ReportFrame::new(Span::new(8, 9), "script.ql", src));
        let rendered = d.render(ColorMode::Never, false);
        assert!(rendered.contains("error[NameError]: name 'x' is not defined"));
        assert!(rendered.contains("--> script.ql:1:9"));
        assert!(rendered.contains("1 | pub y = x + 2;"));
        assert!(rendered.contains("|         ^"));
    }

    #[test]
    fn renders_stacked_frames_innermost_first() {
        let d = Diagnostic::error("TypeError", "bad")
            .with_frame(
                ReportFrame::new(Span::new(0, 3), "inner.ql", "foo")
                    .with_context("in function 'f'"),
            )
            .with_frame(ReportFrame::new(Span::new(0, 3), "outer.ql", "bar"));
        let rendered = d.render(ColorMode::Never, false);
        let inner_pos = rendered.find("inner.ql").unwrap();
        let outer_pos = rendered.find("outer.ql").unwrap();
        assert!(inner_pos < outer_pos);
        assert!(rendered.contains("= in function 'f'"));
    }

    #[test]
    fn color_mode_resolution() {
        assert!(ColorMode::Auto.enabled(true));
        assert!(!ColorMode::Auto.enabled(false));
        assert!(ColorMode::Always.enabled(false));
        assert!(!ColorMode::Never.enabled(true));
    }
}
