//! Interactive read-eval-print loop.
//!
//! One interpreter lives for the whole session, so declarations persist
//! and imports stay cached across lines.

use std::io::{self, BufRead, Write};

use quill_eval::{repr_of, Interpreter, Value};
use quill_ir::SharedInterner;

use crate::report;

/// Start the REPL on stdin/stdout.
pub fn repl() {
    println!("quill {} - :help for help, :quit to exit", Interpreter::VERSION);

    let interner = SharedInterner::new();
    let mut interp = Interpreter::with_interner(interner, "<repl>", "");
    let stdin = io::stdin();
    let mut line_no = 0usize;

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();

        match input {
            "" => continue,
            ":quit" | ":q" => break,
            ":help" | ":h" => {
                println!("Commands:");
                println!("  :quit, :q   Exit");
                println!("  :help, :h   Show this help");
                println!("Statements end with ';' (added for you on bare expressions).");
                continue;
            }
            _ => {}
        }

        // Bare expressions get their semicolon for free.
        let mut source = input.to_string();
        if !source.ends_with(';') && !source.ends_with('}') {
            source.push(';');
        }

        line_no += 1;
        let filename = format!("<repl:{line_no}>");
        let program = match quill_parse::parse_source(&source, &interp.interner) {
            Ok(program) => program,
            Err(err) => {
                report(&err.to_diagnostic(&filename, &source));
                continue;
            }
        };

        interp.set_source(&filename, &source);
        match interp.run(&program) {
            Ok(Value::Null) => {}
            Ok(value) => match repr_of(&mut interp, &value) {
                Ok(text) => println!("{text}"),
                Err(_) => println!("<unprintable>"),
            },
            Err(err) => report(&err.to_diagnostic()),
        }
    }
}
