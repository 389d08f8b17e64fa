//! Token cursor: navigation over the lexed stream.

use quill_ir::{Span, Token, TokenKind};

/// Cursor over a token slice.
///
/// Invariant: the slice is non-empty and ends with `Eof`; the position
/// never moves past the `Eof` token, so `current()` is always valid.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(
            matches!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof)),
            "token stream must end with Eof"
        );
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Kind of the token `n` ahead of the current one (saturating at Eof).
    #[inline]
    pub fn peek_kind(&self, n: usize) -> &TokenKind {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    /// Span of the most recently consumed token.
    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos == 0 {
            Span::DUMMY
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    /// Consume and return the current token. At `Eof` this keeps
    /// returning `Eof` without moving.
    pub fn advance(&mut self) -> Token {
        let token = *self.current();
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    /// True if the current token matches `kind` exactly.
    ///
    /// Only useful for payload-free kinds; payload-carrying variants are
    /// matched structurally by callers.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consume the current token if it matches `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_ir::Span;

    fn toks(kinds: &[TokenKind]) -> Vec<Token> {
        kinds
            .iter()
            .enumerate()
            .map(|(i, k)| Token::new(*k, Span::point(i as u32)))
            .collect()
    }

    #[test]
    fn advance_stops_at_eof() {
        let tokens = toks(&[TokenKind::Plus, TokenKind::Eof]);
        let mut cursor = Cursor::new(&tokens);
        assert_eq!(cursor.advance().kind, TokenKind::Plus);
        assert_eq!(cursor.advance().kind, TokenKind::Eof);
        assert_eq!(cursor.advance().kind, TokenKind::Eof);
        assert!(cursor.at_end());
    }

    #[test]
    fn peek_saturates() {
        let tokens = toks(&[TokenKind::Plus, TokenKind::Eof]);
        let cursor = Cursor::new(&tokens);
        assert_eq!(*cursor.peek_kind(1), TokenKind::Eof);
        assert_eq!(*cursor.peek_kind(10), TokenKind::Eof);
    }

    #[test]
    fn eat_only_on_match() {
        let tokens = toks(&[TokenKind::Comma, TokenKind::Eof]);
        let mut cursor = Cursor::new(&tokens);
        assert!(!cursor.eat(TokenKind::Dot));
        assert!(cursor.eat(TokenKind::Comma));
    }
}
