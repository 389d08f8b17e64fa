//! Quill IR - shared data structures for the Quill interpreter.
//!
//! Everything downstream of the lexer speaks in these types:
//!
//! - [`Span`]: compact byte-offset source locations
//! - [`Name`] / [`StringInterner`]: interned identifiers
//! - [`Token`] / [`TokenKind`]: the lexer's output
//! - [`Stmt`] / [`Expr`]: the Box-based AST the parser produces and the
//!   interpreter walks
//!
//! Spans store byte offsets only; line/column information is recomputed
//! from the source text on demand when a diagnostic is rendered.

mod ast;
mod interner;
mod name;
mod ops;
mod span;
mod token;

pub use ast::{
    Expr, ExprKind, FormatPart, FuncLit, Param, ParamKind, Stmt, StmtKind, VersionReq, Vis,
};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use ops::{BinaryOp, UnaryOp};
pub use span::Span;
pub use token::{Token, TokenKind};
