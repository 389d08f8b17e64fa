//! Function values: closures over AST bodies, and native functions.

use std::fmt;
use std::rc::Rc;

use quill_ir::{Expr, Name, ParamKind, Stmt};

use crate::context::NativeContext;
use crate::signal::EvalResult;
use crate::value::Value;

/// Host implementation of a native function.
///
/// Natives receive the capability context and the raw call arguments;
/// no scope is created for them.
pub type NativeFn = Rc<dyn Fn(&mut NativeContext<'_>, CallArgs) -> EvalResult>;

/// Arguments as passed at a call site.
#[derive(Clone, Debug, Default)]
pub struct CallArgs {
    pub args: Vec<Value>,
    pub kwargs: Vec<(Name, Value)>,
}

impl CallArgs {
    pub fn positional(args: Vec<Value>) -> Self {
        CallArgs {
            args,
            kwargs: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }
}

/// A parameter's default, if any.
///
/// AST defaults are re-evaluated lazily on every call that needs them;
/// native functions use pre-computed values.
#[derive(Clone, Debug)]
pub enum ParamDefault {
    Expr(Rc<Expr>),
    Value(Value),
}

/// One bound parameter of a function value.
#[derive(Clone, Debug)]
pub struct ParamSpec {
    pub name: Name,
    pub kind: ParamKind,
    pub default: Option<ParamDefault>,
}

impl ParamSpec {
    pub fn new(name: Name, kind: ParamKind) -> Self {
        ParamSpec {
            name,
            kind,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: ParamDefault) -> Self {
        self.default = Some(default);
        self
    }
}

/// Function body: an AST block, or a host callable.
#[derive(Clone)]
pub enum FuncBody {
    Ast(Rc<[Stmt]>),
    Native { name: &'static str, func: NativeFn },
}

impl fmt::Debug for FuncBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuncBody::Ast(stmts) => write!(f, "Ast({} stmts)", stmts.len()),
            FuncBody::Native { name, .. } => write!(f, "Native({name})"),
        }
    }
}

/// A function value.
///
/// Closures capture `parent_scope`, the scope object they were defined
/// in; calling pushes a fresh scope parented to it. Partial application
/// produces a new `FuncValue` sharing the body, with the pre-bound
/// arguments accumulated in declaration order — partials are prepended
/// ahead of call-site arguments, so `f[1][2](3)` equals `f(1, 2, 3)`.
#[derive(Clone, Debug)]
pub struct FuncValue {
    pub name: Option<Name>,
    pub params: Vec<ParamSpec>,
    pub body: FuncBody,
    pub parent_scope: Option<Value>,
    pub partial_args: Vec<Value>,
    pub partial_kwargs: Vec<(Name, Value)>,
}

impl FuncValue {
    /// AST-bodied closure.
    pub fn closure(
        name: Option<Name>,
        params: Vec<ParamSpec>,
        body: Rc<[Stmt]>,
        parent_scope: Value,
    ) -> Self {
        FuncValue {
            name,
            params,
            body: FuncBody::Ast(body),
            parent_scope: Some(parent_scope),
            partial_args: Vec::new(),
            partial_kwargs: Vec::new(),
        }
    }

    /// Native function with no declared parameters (natives validate
    /// their own arguments).
    pub fn native(name: &'static str, func: NativeFn) -> Self {
        FuncValue {
            name: None,
            params: Vec::new(),
            body: FuncBody::Native { name, func },
            parent_scope: None,
            partial_args: Vec::new(),
            partial_kwargs: Vec::new(),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self.body, FuncBody::Native { .. })
    }

    /// Display name for error messages.
    pub fn describe(&self, interner: &quill_ir::StringInterner) -> String {
        match (&self.body, self.name) {
            (FuncBody::Native { name, .. }, _) => format!("function '{name}'"),
            (_, Some(name)) => format!("function '{}'", interner.lookup(name)),
            _ => "anonymous function".to_string(),
        }
    }

    /// New function with additional pre-bound arguments.
    ///
    /// Existing partials stay ahead of the new ones; call-site keywords
    /// override earlier partial keywords at binding time.
    #[must_use]
    pub fn with_partial(&self, args: CallArgs) -> FuncValue {
        let mut partial = self.clone();
        partial.partial_args.extend(args.args);
        partial.partial_kwargs.extend(args.kwargs);
        partial
    }
}
