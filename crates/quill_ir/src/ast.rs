//! The abstract syntax tree.
//!
//! A Box-based tree with strict ownership: every node owns its children,
//! there are no back-pointers, and nodes are immutable once built. Each
//! node carries the [`Span`] of the source it was parsed from so runtime
//! errors can point back at the offending text.

use crate::{BinaryOp, Name, Span, UnaryOp};

/// Declaration visibility.
///
/// `Pub` and `Priv` select which attribute namespace of the enclosing
/// scope object receives the binding; `Spec` installs the value into the
/// scope object's protocol table instead.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Vis {
    Pub,
    Priv,
    Spec,
}

/// A statement node.
#[derive(Clone, PartialEq, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// Statement variants.
#[derive(Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// `pub x = e;` / `priv x = e;` / `spec repr = e;`
    VarDecl {
        vis: Vis,
        name: Name,
        value: Option<Expr>,
    },
    /// `pub fn f(a, b) { ... }`.
    ///
    /// Decorated declarations never reach this variant: the parser
    /// desugars `@d pub fn f() {}` into a `VarDecl` whose value is the
    /// bracket-call `d[fn]`, applied innermost first.
    FuncDecl {
        vis: Vis,
        name: Name,
        func: FuncLit,
    },
    /// `pub type Point { ... }`
    TypeDecl { name: Name, body: Vec<Stmt> },
    /// `pub property area { ... }` — a zero-argument body invoked on read.
    PropDecl {
        vis: Vis,
        name: Name,
        body: Vec<Stmt>,
    },
    /// A bare `{ ... }` block introducing a scope.
    Block(Vec<Stmt>),
    /// `if c { } elif c2 { } else { }` — branches in order, each a
    /// condition plus body.
    If {
        branches: Vec<(Expr, Vec<Stmt>)>,
        else_body: Option<Vec<Stmt>>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    ForLoop {
        binding: Name,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    /// `try { } catch Filter as e { }`
    TryCatch {
        body: Vec<Stmt>,
        filter: Option<Expr>,
        binding: Option<Name>,
        handler: Vec<Stmt>,
    },
    SwitchCase {
        scrutinee: Expr,
        cases: Vec<(Expr, Vec<Stmt>)>,
        default: Option<Vec<Stmt>>,
    },
    /// `edit obj { ... }` — runs the body with `obj` as the current scope.
    Edit {
        target: Expr,
        body: Vec<Stmt>,
    },
    Return(Option<Expr>),
    /// `break;` / `break n;`
    Break(Option<Expr>),
    Continue(Option<Expr>),
    Raise(Expr),
    /// `del x;` / `del obj.attr;` — target is an `Ident` or `GetAttr`.
    Del(Expr),
    VersionReq(VersionReq),
    ImportReq {
        name: Name,
        alias: Option<Name>,
    },
    /// `target = value;` — target is an `Ident`, `GetAttr`, `GetPriv`,
    /// altcall index, or `DynamicId`.
    Assign {
        target: Expr,
        value: Expr,
    },
    ExprStmt(Expr),
}

/// An expression node.
#[derive(Clone, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Expression variants.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    Null,
    Bool(bool),
    Num(f64),
    Str(Name),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Ident(Name),
    /// `$(expr)` — the expression evaluates to the name to look up.
    DynamicId(Box<Expr>),
    /// Parenthesised expression, kept as a node for faithful AST dumps.
    Par(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `f(a, k=v)` when `alt` is false, `f[a, k=v]` when true.
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        kwargs: Vec<(Name, Expr)>,
        alt: bool,
    },
    GetAttr {
        target: Box<Expr>,
        name: Name,
    },
    /// `obj.#name` — private attribute access.
    GetPriv {
        target: Box<Expr>,
        name: Name,
    },
    /// f-string: alternating text and interpolated expressions.
    Format(Vec<FormatPart>),
    /// `re"pattern"` — raw pattern text, compiled at evaluation time.
    Regex(Name),
    /// `fn (params) { body }` in expression position.
    Lambda(FuncLit),
}

/// One segment of an f-string.
#[derive(Clone, PartialEq, Debug)]
pub enum FormatPart {
    Text(Name),
    /// `{expr}` or `{expr:spec}`; the spec text is passed to the value's
    /// format protocol verbatim.
    Expr(Expr, Option<Name>),
}

/// A function literal: shared by named declarations and lambdas.
#[derive(Clone, PartialEq, Debug)]
pub struct FuncLit {
    pub name: Option<Name>,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

/// How a parameter may be bound at the call site.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParamKind {
    /// Positional-only (declared before a `/` marker).
    Arg,
    /// Keyword-only (declared after a bare `*` marker).
    Kwarg,
    /// Either position or keyword (the default).
    ArgOrKwarg,
    /// `*rest` — collects remaining positionals into a list.
    Vararg,
    /// `**extra` — collects remaining keywords into a dict.
    Varkwarg,
}

/// One declared parameter.
///
/// The default is an unevaluated expression, re-evaluated on every call
/// that needs it.
#[derive(Clone, PartialEq, Debug)]
pub struct Param {
    pub name: Name,
    pub kind: ParamKind,
    pub default: Option<Expr>,
}

impl Param {
    pub fn new(name: Name, kind: ParamKind) -> Self {
        Param {
            name,
            kind,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Expr) -> Self {
        self.default = Some(default);
        self
    }
}

/// A version requirement from a `req` statement.
///
/// Version payloads are the interned numeric part (`"1.2"` or `"1.2.3"`);
/// parsing into a comparable version happens at evaluation time.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VersionReq {
    /// `req v1.2;` — same major.minor (patch ignored when absent).
    Exact(Name),
    /// `req +v1.2;` — at least.
    AtLeast(Name),
    /// `req -v1.2;` — at most.
    AtMost(Name),
    /// `req v1.0 - v2.0;` — inclusive range.
    Range(Name, Name),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_builder_attaches_default() {
        let default = Expr::new(ExprKind::Num(10.0), Span::DUMMY);
        let param = Param::new(Name::EMPTY, ParamKind::ArgOrKwarg).with_default(default.clone());
        assert_eq!(param.default, Some(default));
    }

    #[test]
    fn stmt_carries_span() {
        let stmt = Stmt::new(StmtKind::Return(None), Span::new(3, 10));
        assert_eq!(stmt.span, Span::new(3, 10));
    }
}
