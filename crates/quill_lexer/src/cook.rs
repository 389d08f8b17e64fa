//! Cooking: raw token + slice -> `TokenKind` with interned payloads.

use quill_ir::{Span, StringInterner, TokenKind};

use crate::raw::RawToken;
use crate::{LexError, LexErrorKind};

/// Resolve escape sequences in a quoted body.
///
/// Supported escapes: `\n \t \r \\ \" \' \0` and `\x##`. Anything else
/// is an error pointing at the escape character.
pub(crate) fn cook_escapes(raw: &str, span: Span) -> Result<String, LexError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hi = chars.next();
                let lo = chars.next();
                let byte = match (hi, lo) {
                    (Some(h), Some(l)) => {
                        u8::from_str_radix(&format!("{h}{l}"), 16).map_err(|_| {
                            LexError::new(LexErrorKind::InvalidEscape('x'), span)
                        })?
                    }
                    _ => return Err(LexError::new(LexErrorKind::InvalidEscape('x'), span)),
                };
                out.push(byte as char);
            }
            Some(other) => return Err(LexError::new(LexErrorKind::InvalidEscape(other), span)),
            None => return Err(LexError::new(LexErrorKind::InvalidEscape('\0'), span)),
        }
    }
    Ok(out)
}

pub(crate) fn cook(
    raw: RawToken,
    slice: &str,
    span: Span,
    interner: &StringInterner,
) -> Result<TokenKind, LexError> {
    let kind = match raw {
        RawToken::Num => {
            let value: f64 = slice
                .parse()
                .map_err(|_| LexError::new(LexErrorKind::MalformedNumber, span))?;
            TokenKind::Num(value)
        }
        RawToken::Str => {
            let body = &slice[1..slice.len() - 1];
            TokenKind::Str(interner.intern(&cook_escapes(body, span)?))
        }
        RawToken::FStr => {
            // Strip `f"` and `"`; escapes are cooked now, interpolation
            // splitting happens in the parser.
            let body = &slice[2..slice.len() - 1];
            TokenKind::FStr(interner.intern(&cook_escapes(body, span)?))
        }
        RawToken::Regex => {
            // Strip `re"` and `"`; the pattern keeps its own escapes.
            let body = &slice[3..slice.len() - 1];
            TokenKind::Regex(interner.intern(body))
        }
        RawToken::Version => {
            // Strip the leading `v`.
            TokenKind::Version(interner.intern(&slice[1..]))
        }
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        RawToken::Pub => TokenKind::Pub,
        RawToken::Priv => TokenKind::Priv,
        RawToken::Spec => TokenKind::Spec,
        RawToken::Fn => TokenKind::Fn,
        RawToken::Type => TokenKind::Type,
        RawToken::Property => TokenKind::Property,
        RawToken::Edit => TokenKind::Edit,
        RawToken::If => TokenKind::If,
        RawToken::Elif => TokenKind::Elif,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::For => TokenKind::For,
        RawToken::In => TokenKind::In,
        RawToken::Try => TokenKind::Try,
        RawToken::Catch => TokenKind::Catch,
        RawToken::As => TokenKind::As,
        RawToken::Switch => TokenKind::Switch,
        RawToken::Case => TokenKind::Case,
        RawToken::Default => TokenKind::Default,
        RawToken::Return => TokenKind::Return,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Raise => TokenKind::Raise,
        RawToken::Del => TokenKind::Del,
        RawToken::Req => TokenKind::Req,
        RawToken::Import => TokenKind::Import,
        RawToken::Null => TokenKind::Null,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,

        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::StarStar => TokenKind::StarStar,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Identical => TokenKind::Identical,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::Assign => TokenKind::Assign,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LessEq => TokenKind::LessEq,
        RawToken::Less => TokenKind::Less,
        RawToken::GreaterEq => TokenKind::GreaterEq,
        RawToken::Greater => TokenKind::Greater,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::Amp => TokenKind::Amp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Question => TokenKind::Question,
        RawToken::At => TokenKind::At,
        RawToken::Dollar => TokenKind::Dollar,
        RawToken::DotHash => TokenKind::DotHash,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
    };
    Ok(kind)
}
