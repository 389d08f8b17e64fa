//! Quill CLI commands: run a file or inline source, dump tokens or the
//! AST, and the REPL loop.

mod repl;
mod run;

pub use repl::repl;
pub use run::{run_source, RunMode, RunOptions};

use std::io::IsTerminal;

use quill_diagnostic::{ColorMode, Diagnostic};

/// Print a diagnostic to stderr, with colors when it is a terminal.
pub(crate) fn report(diagnostic: &Diagnostic) {
    let is_tty = std::io::stderr().is_terminal();
    eprint!("{}", diagnostic.render(ColorMode::Auto, is_tty));
}
