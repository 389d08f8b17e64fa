//! Token stream dumping for the `--lex` flag.

use std::fmt::Write as _;

use quill_ir::{Token, TokenKind};

fn kind_label(kind: &TokenKind) -> &'static str {
    match kind {
        TokenKind::Num(_) => "num",
        TokenKind::Str(_) => "str",
        TokenKind::FStr(_) => "fstr",
        TokenKind::Regex(_) => "regex",
        TokenKind::Version(_) => "version",
        TokenKind::Ident(_) => "ident",
        TokenKind::Eof => "eof",
        // Keywords and punctuation render via describe(), minus quoting.
        _ => "punct",
    }
}

/// Render a token stream, one `offset kind lexeme` line per token.
///
/// Lexemes are the original source slices, so concatenating them (space
/// separated) re-lexes to an equivalent stream — the round-trip the
/// integration tests rely on.
pub fn dump_tokens(tokens: &[Token], source: &str) -> String {
    let mut out = String::new();
    for token in tokens {
        let label = match kind_label(&token.kind) {
            "punct" => token.kind.describe(),
            other => other,
        };
        let lexeme = token.lexeme(source);
        let _ = writeln!(out, "{:>5}  {:<12} {}", token.span.start, label, lexeme);
    }
    out
}
