//! Recursive-descent parser for Quill.
//!
//! Consumes the token stream from `quill_lexer` and produces the
//! Box-based AST from `quill_ir`. Every recursive entry point runs under
//! [`quill_stack::ensure_sufficient_stack`], so pathological nesting
//! grows the stack instead of overflowing it.
//!
//! Statement/expression ambiguity for `{` is resolved by position: a
//! brace in statement position opens a block, in expression position a
//! dict literal.

mod cursor;
mod error;
mod expr;
mod stmt;

pub use error::ParseError;

use quill_ir::{SharedInterner, Stmt, Token};

use crate::cursor::Cursor;

/// Parser state: a token cursor plus the shared interner.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    interner: &'a SharedInterner,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], interner: &'a SharedInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            interner,
        }
    }

    /// Parse a whole program: statements up to end of input.
    pub fn parse_program(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while !self.cursor.at_end() {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }
}

/// Lex and parse `source` in one step.
///
/// Lexical errors are folded into [`ParseError`]; callers that want to
/// distinguish them lex separately first.
pub fn parse_source(source: &str, interner: &SharedInterner) -> Result<Vec<Stmt>, ParseError> {
    let tokens = quill_lexer::lex(source, interner).map_err(ParseError::from_lex)?;
    parse_tokens(&tokens, interner)
}

/// Parse an already-lexed token stream.
pub fn parse_tokens(tokens: &[Token], interner: &SharedInterner) -> Result<Vec<Stmt>, ParseError> {
    let mut parser = Parser::new(tokens, interner);
    let program = parser.parse_program()?;
    tracing::debug!(statements = program.len(), "parsed program");
    Ok(program)
}

/// Parse a single expression, requiring the input to be fully consumed.
///
/// Used for f-string interpolation fragments and by the REPL.
pub fn parse_expression(
    source: &str,
    interner: &SharedInterner,
) -> Result<quill_ir::Expr, ParseError> {
    let tokens = quill_lexer::lex(source, interner).map_err(ParseError::from_lex)?;
    let mut parser = Parser::new(&tokens, interner);
    let expr = parser.parse_expr()?;
    if !parser.cursor.at_end() {
        let token = *parser.cursor.current();
        return Err(ParseError::unexpected(&token, "end of expression"));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests;
