//! Lexer for Quill.
//!
//! Two layers: a `logos`-derived raw token recognizer, and a cooking pass
//! that interns identifiers and literal payloads, resolves escape
//! sequences, and parses numeric values. The output is a `Vec<Token>`
//! that always ends with exactly one `Eof` token.
//!
//! F-string and regex bodies are captured raw; the parser splits f-string
//! interpolations itself, and regexes keep their own escape language.

mod cook;
mod dump;
mod error;
mod raw;

pub use dump::dump_tokens;
pub use error::{LexError, LexErrorKind};

use logos::Logos;
use quill_ir::{Span, StringInterner, Token, TokenKind};

use crate::raw::RawToken;

/// Lex `source` into a token stream.
///
/// On success the stream is non-empty and terminated by `Eof`. The first
/// lexical error aborts the lex; its span points at the offending bytes.
pub fn lex(source: &str, interner: &StringInterner) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        match result {
            Ok(raw) => {
                let kind = cook::cook(raw, lexer.slice(), span, interner)?;
                tokens.push(Token::new(kind, span));
            }
            Err(()) => {
                return Err(error::classify(lexer.slice(), span));
            }
        }
    }

    tokens.push(Token::new(
        TokenKind::Eof,
        Span::point(u32::try_from(source.len()).unwrap_or(u32::MAX)),
    ));
    Ok(tokens)
}

#[cfg(test)]
mod tests;
