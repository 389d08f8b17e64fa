//! Quill interpreter CLI.
//!
//! ```text
//! quill <file.ql> [--lex | --ast] [--debug]
//! quill -c "<code>" [--lex | --ast] [--debug]
//! quill repl
//! quill            (no args: REPL)
//! ```

use quillc::{repl, run_source, RunMode, RunOptions};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut options = RunOptions::default();
    let mut inline: Option<String> = None;
    let mut file: Option<String> = None;
    let mut want_repl = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--lex" => options.mode = RunMode::DumpTokens,
            "--ast" => options.mode = RunMode::DumpAst,
            "--debug" => options.debug = true,
            "-c" => {
                if i + 1 >= args.len() {
                    eprintln!("error: -c needs a code string");
                    print_usage();
                    std::process::exit(2);
                }
                inline = Some(args[i + 1].clone());
                i += 1;
            }
            "repl" => want_repl = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other if other.starts_with('-') => {
                eprintln!("error: unknown flag '{other}'");
                print_usage();
                std::process::exit(2);
            }
            other => {
                if file.is_some() {
                    eprintln!("error: more than one input file");
                    std::process::exit(2);
                }
                file = Some(other.to_string());
            }
        }
        i += 1;
    }

    if want_repl || (inline.is_none() && file.is_none()) {
        repl();
        return;
    }

    let exit_code = if let Some(code) = inline {
        run_source("<inline>", &code, &options)
    } else if let Some(path) = file {
        match std::fs::read_to_string(&path) {
            Ok(source) => run_source(&path, &source, &options),
            Err(err) => {
                eprintln!("error: cannot read '{path}': {err}");
                2
            }
        }
    } else {
        unreachable!("repl case handled above")
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("QUILL_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    eprintln!("Usage: quill <file.ql> [options]");
    eprintln!("       quill -c \"<code>\" [options]");
    eprintln!("       quill repl");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --lex      Dump the token stream instead of executing");
    eprintln!("  --ast      Dump the parsed AST instead of executing");
    eprintln!("  --debug    Show raw error structures (implementer debugging)");
}
