//! Execute (or dump) a source buffer.

use quill_diagnostic::{Diagnostic, ReportFrame};
use quill_eval::Interpreter;
use quill_ir::SharedInterner;

use crate::report;

/// What to do with the parsed input.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum RunMode {
    /// Lex, parse, evaluate.
    #[default]
    Execute,
    /// Dump the token stream instead of executing.
    DumpTokens,
    /// Dump the parsed AST instead of executing.
    DumpAst,
}

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub mode: RunMode,
    /// Show raw host error structures instead of rendered reports.
    pub debug: bool,
}

/// Run one source buffer; returns the process exit code.
pub fn run_source(filename: &str, source: &str, options: &RunOptions) -> i32 {
    let interner = SharedInterner::new();

    let tokens = match quill_lexer::lex(source, &interner) {
        Ok(tokens) => tokens,
        Err(err) => {
            if options.debug {
                eprintln!("{err:#?}");
                return 1;
            }
            report(
                &Diagnostic::error("SyntaxError", err.to_string())
                    .with_frame(ReportFrame::new(err.span, filename, source)),
            );
            return 1;
        }
    };

    if options.mode == RunMode::DumpTokens {
        print!("{}", quill_lexer::dump_tokens(&tokens, source));
        return 0;
    }

    let program = match quill_parse::parse_tokens(&tokens, &interner) {
        Ok(program) => program,
        Err(err) => {
            if options.debug {
                eprintln!("{err:#?}");
                return 1;
            }
            report(&err.to_diagnostic(filename, source));
            return 1;
        }
    };

    if options.mode == RunMode::DumpAst {
        for stmt in &program {
            println!("{stmt:#?}");
        }
        return 0;
    }

    let mut interp = Interpreter::with_interner(interner, filename, source);
    match interp.run(&program) {
        Ok(_) => 0,
        Err(err) => {
            if options.debug {
                eprintln!("{err:#?}");
            } else {
                report(&err.to_diagnostic());
            }
            1
        }
    }
}
