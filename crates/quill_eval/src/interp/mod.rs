//! The tree-walking interpreter.
//!
//! Owns the environment, the builtins, the import machinery and the
//! version gate. Everything evaluates to an [`EvalResult`]; control
//! flow travels in the `Err` channel as [`Signal`] variants and is
//! consumed by the construct it targets (loops for break/continue, call
//! boundaries for return).

mod calls;
mod imports;
mod version;

pub use imports::LoaderFn;

use std::rc::Rc;

use rustc_hash::FxHashMap;

use quill_ir::{
    BinaryOp, Expr, ExprKind, FormatPart, Name, SharedInterner, Span, Stmt, StmtKind, Vis,
};
use quill_stack::ensure_sufficient_stack;

use crate::dispatch::{
    self, dict_insert, invoke_spec, make_iterator, set_attr, truthy, values_equal,
};
use crate::env::Environment;
use crate::errors::{
    assign_undeclared, cannot_delete, control_outside, no_attribute, scope_error, type_error,
    undefined_name, value_error, RuntimeError, TraceFrame,
};
use crate::print::{PrintHandler, StdoutPrint};
use crate::signal::{EvalResult, Signal};
use crate::spec::SpecName;
use crate::value::{
    CallArgs, DictValue, ErrorValue, FuncValue, ParamDefault, ParamSpec, Shared, Value, ValueTag,
};

/// Names the interpreter compares against often, interned once.
pub(crate) struct CommonNames {
    pub(crate) self_: Name,
    pub(crate) init: Name,
}

impl CommonNames {
    fn new(interner: &SharedInterner) -> Self {
        CommonNames {
            self_: interner.intern("self"),
            init: interner.intern("init"),
        }
    }
}

pub struct Interpreter {
    pub interner: SharedInterner,
    pub env: Environment,
    pub(crate) builtins: FxHashMap<Name, Value>,
    pub(crate) builtin_types: FxHashMap<ValueTag, Value>,
    pub(crate) import_cache: FxHashMap<Name, Value>,
    pub(crate) registry: FxHashMap<Name, Value>,
    pub(crate) loaders: FxHashMap<&'static str, LoaderFn>,
    printer: Rc<dyn PrintHandler>,
    pub(crate) depth: usize,
    pub(crate) names: CommonNames,
    filename: Rc<str>,
    source: Rc<str>,
}

impl Interpreter {
    /// Interpreter language version, checked by `req` statements.
    pub const VERSION: &'static str = "0.4.0";

    pub fn new(filename: &str, source: &str) -> Self {
        Self::with_interner(SharedInterner::new(), filename, source)
    }

    /// Share an interner with another interpreter (nested evaluation).
    pub fn with_interner(interner: SharedInterner, filename: &str, source: &str) -> Self {
        let (builtins, builtin_types) = crate::builtins::build(&interner);
        let names = CommonNames::new(&interner);
        Interpreter {
            env: Environment::new(),
            builtins,
            builtin_types,
            import_cache: FxHashMap::default(),
            registry: FxHashMap::default(),
            loaders: crate::modules::loader_table(),
            printer: Rc::new(StdoutPrint),
            depth: 0,
            names,
            filename: Rc::from(filename),
            source: Rc::from(source),
            interner,
        }
    }

    pub fn set_printer(&mut self, printer: Rc<dyn PrintHandler>) {
        self.printer = printer;
    }

    /// Repoint error frames at a new source (REPL lines re-use one
    /// interpreter across many inputs).
    pub fn set_source(&mut self, filename: &str, source: &str) {
        self.filename = Rc::from(filename);
        self.source = Rc::from(source);
    }

    pub fn printer(&self) -> Rc<dyn PrintHandler> {
        self.printer.clone()
    }

    /// Pre-register a module value under a name, ahead of any loader.
    pub fn register_module(&mut self, name: &str, module: Value) {
        let name = self.interner.intern(name);
        self.registry.insert(name, module);
    }

    pub(crate) fn builtin_type_for(&self, tag: ValueTag) -> Value {
        self.builtin_types
            .get(&tag)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Run a whole program. Control-flow signals reaching the top level
    /// are misuse and convert to typed errors.
    pub fn run(&mut self, program: &[Stmt]) -> Result<Value, RuntimeError> {
        tracing::debug!(statements = program.len(), "running program");
        match self.eval_stmts(program) {
            Ok(value) => Ok(value),
            Err(Signal::Error(err)) => Err(err),
            Err(Signal::Return(_)) => Err(control_outside("return", "function")),
            Err(Signal::Break(_)) => Err(control_outside("break", "loop")),
            Err(Signal::Continue(_)) => Err(control_outside("continue", "loop")),
            Err(Signal::StopIteration) => {
                Err(type_error("'next' signalled exhaustion outside iteration"))
            }
        }
    }

    /// Evaluate statements in order; the result is the last statement's
    /// value (`Null` for an empty sequence).
    pub(crate) fn eval_stmts(&mut self, stmts: &[Stmt]) -> EvalResult {
        let mut last = Value::Null;
        for stmt in stmts {
            last = self.eval_stmt(stmt)?;
        }
        Ok(last)
    }

    fn eval_stmt(&mut self, stmt: &Stmt) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_stmt_inner(stmt))
            .map_err(|signal| self.attach(signal, stmt.span))
    }

    fn eval_stmt_inner(&mut self, stmt: &Stmt) -> EvalResult {
        match &stmt.kind {
            StmtKind::VarDecl { vis, name, value } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Null,
                };
                self.declare(*vis, *name, value, stmt.span)?;
                Ok(Value::Null)
            }
            StmtKind::FuncDecl { vis, name, func } => {
                let value = Value::func(self.make_closure(Some(*name), func));
                self.declare(*vis, *name, value, stmt.span)?;
                Ok(Value::Null)
            }
            StmtKind::TypeDecl { name, body } => {
                let type_value = self.eval_type_decl(*name, body)?;
                self.declare(Vis::Pub, *name, type_value, stmt.span)?;
                Ok(Value::Null)
            }
            StmtKind::PropDecl { vis, name, body } => {
                let func = FuncValue::closure(
                    Some(*name),
                    Vec::new(),
                    Rc::from(body.clone().into_boxed_slice()),
                    self.env.current(),
                );
                self.declare(*vis, *name, Value::property(func), stmt.span)?;
                Ok(Value::Null)
            }
            StmtKind::Block(body) => self.with_child_scope(|interp| interp.eval_stmts(body)),
            StmtKind::If {
                branches,
                else_body,
            } => {
                for (cond, body) in branches {
                    let cond_value = self.eval_expr(cond)?;
                    if truthy(self, &cond_value)? {
                        return self.with_child_scope(|interp| interp.eval_stmts(body));
                    }
                }
                match else_body {
                    Some(body) => self.with_child_scope(|interp| interp.eval_stmts(body)),
                    None => Ok(Value::Null),
                }
            }
            StmtKind::While { cond, body } => self.eval_while(cond, body),
            StmtKind::ForLoop {
                binding,
                iterable,
                body,
            } => self.eval_for(*binding, iterable, body),
            StmtKind::TryCatch {
                body,
                filter,
                binding,
                handler,
            } => self.eval_try(body, filter.as_ref(), *binding, handler),
            StmtKind::SwitchCase {
                scrutinee,
                cases,
                default,
            } => self.eval_switch(scrutinee, cases, default.as_deref()),
            StmtKind::Edit { target, body } => {
                let target_value = self.eval_expr(target)?;
                if !matches!(target_value, Value::Object(_)) {
                    return Err(type_error(format!(
                        "'edit' target must be an Object, got {}",
                        target_value.type_name()
                    ))
                    .into());
                }
                self.with_scope_value(target_value, |interp| interp.eval_stmts(body))?;
                Ok(Value::Null)
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Null,
                };
                Err(Signal::Return(value))
            }
            StmtKind::Break(amount) => {
                let n = self.loop_amount(amount.as_ref())?;
                // Amount zero is a no-op statement.
                if n == 0.0 {
                    Ok(Value::Null)
                } else {
                    Err(Signal::Break(n))
                }
            }
            StmtKind::Continue(amount) => {
                let n = self.loop_amount(amount.as_ref())?;
                if n == 0.0 {
                    Ok(Value::Null)
                } else {
                    Err(Signal::Continue(n))
                }
            }
            StmtKind::Raise(expr) => {
                let value = self.eval_expr(expr)?;
                Err(self.raise_value(value))
            }
            StmtKind::Del(target) => {
                self.eval_del(target)?;
                Ok(Value::Null)
            }
            StmtKind::VersionReq(req) => {
                version::check(&self.interner, req)?;
                Ok(Value::Null)
            }
            StmtKind::ImportReq { name, alias } => {
                let module = self.resolve_import(*name)?;
                self.env.declare(Vis::Pub, alias.unwrap_or(*name), module);
                Ok(Value::Null)
            }
            StmtKind::Assign { target, value } => {
                let value = self.eval_expr(value)?;
                self.eval_assign(target, value)?;
                Ok(Value::Null)
            }
            StmtKind::ExprStmt(expr) => self.eval_expr(expr),
        }
    }

    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Num(n) => Ok(Value::num(*n)),
            ExprKind::Str(s) => Ok(Value::str(self.interner.lookup(*s))),
            ExprKind::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.eval_expr(item)?);
                }
                Ok(Value::list(out))
            }
            ExprKind::Tuple(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.eval_expr(item)?);
                }
                Ok(Value::tuple(out))
            }
            ExprKind::Dict(entries) => {
                let dict = Shared::new(DictValue::new());
                for (key_expr, value_expr) in entries {
                    let key = self.eval_expr(key_expr)?;
                    let value = self.eval_expr(value_expr)?;
                    dict_insert(self, &dict, key, value)?;
                }
                Ok(Value::Dict(dict))
            }
            ExprKind::Ident(name) => self
                .lookup_name(*name)
                .map_err(|signal| self.attach(signal, expr.span)),
            ExprKind::DynamicId(inner) => {
                let name = self.eval_dynamic_name(inner)?;
                self.lookup_name(name)
                    .map_err(|signal| self.attach(signal, expr.span))
            }
            ExprKind::Par(inner) => self.eval_expr(inner),
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right),
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                let spec = SpecName::for_unary(*op);
                invoke_spec(self, &value, spec, CallArgs::default())
                    .map_err(|signal| self.attach(signal, expr.span))
            }
            ExprKind::Call {
                callee,
                args,
                kwargs,
                alt,
            } => self.eval_call(expr.span, callee, args, kwargs, *alt),
            ExprKind::GetAttr { target, name } => {
                let target_value = self.eval_expr(target)?;
                self.get_attr(&target_value, *name)
                    .map_err(|signal| self.attach(signal, expr.span))
            }
            ExprKind::GetPriv { target, name } => {
                let target_value = self.eval_expr(target)?;
                self.get_priv(&target_value, *name)
                    .map_err(|signal| self.attach(signal, expr.span))
            }
            ExprKind::Format(parts) => self.eval_format(parts),
            ExprKind::Regex(pattern) => {
                let pattern = self.interner.lookup(*pattern).to_string();
                crate::modules::regex_object(self, &pattern)
                    .map_err(|signal| self.attach(signal, expr.span))
            }
            ExprKind::Lambda(func) => Ok(Value::func(self.make_closure(func.name, func))),
        }
    }

    // Declarations and lookup

    fn declare(&mut self, vis: Vis, name: Name, value: Value, span: Span) -> Result<(), Signal> {
        if vis == Vis::Spec {
            let slot_name = self.interner.lookup(name);
            let Some(slot) = SpecName::from_str(slot_name) else {
                return Err(self.attach(
                    value_error(format!("'{slot_name}' is not a spec name")).into(),
                    span,
                ));
            };
            self.env.declare_spec(slot, value);
            return Ok(());
        }
        self.env.declare(vis, name, value);
        Ok(())
    }

    fn lookup_name(&mut self, name: Name) -> EvalResult {
        if let Some(found) = self.env.lookup(name)? {
            return Ok(found);
        }
        if let Some(found) = self.builtins.get(&name) {
            return Ok(found.clone());
        }
        Err(undefined_name(self.interner.lookup(name)).into())
    }

    fn eval_dynamic_name(&mut self, expr: &Expr) -> Result<Name, Signal> {
        let value = self.eval_expr(expr)?;
        match value {
            Value::Str(s) => Ok(self.interner.intern(&s)),
            other => Err(type_error(format!(
                "dynamic identifier must be a Str, got {}",
                other.type_name()
            ))
            .into()),
        }
    }

    // Operators

    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult {
        match op {
            // Short-circuit `or` is value-preserving: the first truthy
            // operand, else Null.
            BinaryOp::Or => {
                let lhs = self.eval_expr(left)?;
                if truthy(self, &lhs)? {
                    return Ok(lhs);
                }
                let rhs = self.eval_expr(right)?;
                if truthy(self, &rhs)? {
                    return Ok(rhs);
                }
                Ok(Value::Null)
            }
            // Short-circuit `and` collapses to a Bool.
            BinaryOp::And => {
                let lhs = self.eval_expr(left)?;
                if !truthy(self, &lhs)? {
                    return Ok(Value::Bool(false));
                }
                let rhs = self.eval_expr(right)?;
                Ok(Value::Bool(truthy(self, &rhs)?))
            }
            // Identity is host-level and not overridable.
            BinaryOp::Is => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                Ok(Value::Bool(lhs.is_identical(&rhs)))
            }
            // `item in container` dispatches on the container.
            BinaryOp::HasItem => {
                let item = self.eval_expr(left)?;
                let container = self.eval_expr(right)?;
                invoke_spec(
                    self,
                    &container,
                    SpecName::HasItem,
                    CallArgs::positional(vec![item]),
                )
            }
            _ => {
                let spec = SpecName::for_binary(op)
                    .unwrap_or_else(|| unreachable!("direct ops handled above"));
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                invoke_spec(self, &lhs, spec, CallArgs::positional(vec![rhs]))
            }
        }
    }

    // Calls and attribute access

    fn eval_call(
        &mut self,
        span: Span,
        callee: &Expr,
        args: &[Expr],
        kwargs: &[(Name, Expr)],
        alt: bool,
    ) -> EvalResult {
        let callee_value = self.eval_expr(callee)?;
        let mut call = CallArgs::default();
        for arg in args {
            call.args.push(self.eval_expr(arg)?);
        }
        for (name, expr) in kwargs {
            call.kwargs.push((*name, self.eval_expr(expr)?));
        }
        let spec = if alt { SpecName::AltCall } else { SpecName::Call };
        invoke_spec(self, &callee_value, spec, call)
            .map_err(|signal| self.attach_call(signal, span, &callee_value))
    }

    fn get_attr(&mut self, target: &Value, name: Name) -> EvalResult {
        let attr = Value::str(self.interner.lookup(name));
        let found = invoke_spec(
            self,
            target,
            SpecName::GetAttr,
            CallArgs::positional(vec![attr]),
        )?;
        // Properties auto-invoke on read (the `get` slot), with the
        // owning value chained into scope and bound as `self`.
        if let Value::Property(f) = &found {
            let mut rebound = (**f).clone();
            rebound.parent_scope = Some(target.clone());
            return self.call_function_with_extras(
                &rebound,
                CallArgs::default(),
                &[(self.names.self_, target.clone())],
            );
        }
        Ok(found)
    }

    fn get_priv(&mut self, target: &Value, name: Name) -> EvalResult {
        self.check_priv_access(target)?;
        let Value::Object(obj) = target else {
            return Err(type_error(format!(
                "{} has no private attributes",
                target.type_name()
            ))
            .into());
        };
        let found = obj.borrow().private.get(&name).cloned();
        found.ok_or_else(|| {
            Signal::from(no_attribute(
                "private namespace",
                self.interner.lookup(name),
            ))
        })
    }

    /// Private access is only legal on objects that are part of the
    /// current scope chain (`self` inside methods, the edited object
    /// inside `edit` blocks).
    fn check_priv_access(&self, target: &Value) -> Result<(), Signal> {
        if self.env.contains_scope(target) {
            Ok(())
        } else {
            Err(scope_error(
                "private attributes are only accessible within their defining scope",
            )
            .into())
        }
    }

    // Control flow

    fn eval_while(&mut self, cond: &Expr, body: &[Stmt]) -> EvalResult {
        loop {
            let cond_value = self.eval_expr(cond)?;
            if !truthy(self, &cond_value)? {
                break;
            }
            match self.with_child_scope(|interp| interp.eval_stmts(body)) {
                Ok(_) => {}
                Err(Signal::Break(n)) => {
                    let remaining = n - 1.0;
                    if remaining > 0.0 {
                        return Err(Signal::Break(remaining));
                    }
                    break;
                }
                Err(Signal::Continue(n)) => {
                    let remaining = n - 1.0;
                    if remaining > 0.0 {
                        return Err(Signal::Continue(remaining));
                    }
                }
                Err(other) => return Err(other),
            }
        }
        Ok(Value::Null)
    }

    fn eval_for(&mut self, binding: Name, iterable: &Expr, body: &[Stmt]) -> EvalResult {
        let source = self.eval_expr(iterable)?;
        let iterator = make_iterator(self, &source)?;
        loop {
            let item = match invoke_spec(self, &iterator, SpecName::Next, CallArgs::default()) {
                Ok(item) => item,
                Err(Signal::StopIteration) => break,
                Err(other) => return Err(other),
            };
            let result = self.with_child_scope(|interp| {
                interp.env.declare(Vis::Pub, binding, item);
                interp.eval_stmts(body)
            });
            match result {
                Ok(_) => {}
                Err(Signal::Break(n)) => {
                    let remaining = n - 1.0;
                    if remaining > 0.0 {
                        return Err(Signal::Break(remaining));
                    }
                    break;
                }
                // A multi-level continue that still targets an outer
                // loop re-raises; this loop's iterator has already
                // advanced, which is exactly the skip the outer level
                // expects to observe.
                Err(Signal::Continue(n)) => {
                    let remaining = n - 1.0;
                    if remaining > 0.0 {
                        return Err(Signal::Continue(remaining));
                    }
                }
                Err(other) => return Err(other),
            }
        }
        Ok(Value::Null)
    }

    fn loop_amount(&mut self, amount: Option<&Expr>) -> Result<f64, Signal> {
        let value = match amount {
            Some(expr) => self.eval_expr(expr)?,
            None => return Ok(1.0),
        };
        match value {
            Value::Num(n) if n >= 0.0 => Ok(n),
            Value::Num(n) => {
                Err(value_error(format!("loop amount must be non-negative, got {n}")).into())
            }
            other => Err(type_error(format!(
                "loop amount must be a Num, got {}",
                other.type_name()
            ))
            .into()),
        }
    }

    fn eval_try(
        &mut self,
        body: &[Stmt],
        filter: Option<&Expr>,
        binding: Option<Name>,
        handler: &[Stmt],
    ) -> EvalResult {
        match self.with_child_scope(|interp| interp.eval_stmts(body)) {
            Ok(value) => Ok(value),
            // Only typed errors are catchable; control signals pass.
            Err(Signal::Error(err)) => {
                let attached = err
                    .payload
                    .clone()
                    .unwrap_or_else(|| Value::error(ErrorValue::from_runtime(&err)));
                if let Some(filter_expr) = filter {
                    let filter_value = self.eval_expr(filter_expr)?;
                    if !matches!(filter_value, Value::Type(_)) {
                        return Err(type_error(format!(
                            "catch filter must be a Type, got {}",
                            filter_value.type_name()
                        ))
                        .into());
                    }
                    if !crate::value::check_value(&filter_value, &attached) {
                        return Err(Signal::Error(err));
                    }
                }
                self.with_child_scope(|interp| {
                    if let Some(binding) = binding {
                        interp.env.declare(Vis::Pub, binding, attached);
                    }
                    interp.eval_stmts(handler)
                })
            }
            Err(other) => Err(other),
        }
    }

    fn eval_switch(
        &mut self,
        scrutinee: &Expr,
        cases: &[(Expr, Vec<Stmt>)],
        default: Option<&[Stmt]>,
    ) -> EvalResult {
        let subject = self.eval_expr(scrutinee)?;
        for (case_expr, body) in cases {
            let case_value = self.eval_expr(case_expr)?;
            if values_equal(self, &subject, &case_value)? {
                return self.with_child_scope(|interp| interp.eval_stmts(body));
            }
        }
        match default {
            Some(body) => self.with_child_scope(|interp| interp.eval_stmts(body)),
            None => Ok(Value::Null),
        }
    }

    // Raise / del / assignment

    fn raise_value(&mut self, value: Value) -> Signal {
        match &value {
            Value::Error(e) => {
                let mut err = e.to_runtime();
                err.payload = Some(value.clone());
                Signal::Error(err)
            }
            other => {
                let message = match dispatch::str_of(self, other) {
                    Ok(text) => text,
                    Err(signal) => return signal,
                };
                Signal::Error(
                    RuntimeError::new(crate::errors::ErrorKind::Raised, message)
                        .with_payload(value),
                )
            }
        }
    }

    fn eval_del(&mut self, target: &Expr) -> Result<(), Signal> {
        match &target.kind {
            ExprKind::Ident(name) => {
                if self.env.remove(*name)? {
                    return Ok(());
                }
                Err(cannot_delete(self.interner.lookup(*name)).into())
            }
            ExprKind::GetAttr { target, name } => {
                let target_value = self.eval_expr(target)?;
                let Value::Object(obj) = &target_value else {
                    return Err(type_error(format!(
                        "cannot delete attribute of {}",
                        target_value.type_name()
                    ))
                    .into());
                };
                if obj.borrow_mut().public.remove(name).is_some() {
                    Ok(())
                } else {
                    Err(no_attribute("Object", self.interner.lookup(*name)).into())
                }
            }
            ExprKind::GetPriv { target, name } => {
                let target_value = self.eval_expr(target)?;
                self.check_priv_access(&target_value)?;
                let Value::Object(obj) = &target_value else {
                    return Err(type_error(format!(
                        "{} has no private attributes",
                        target_value.type_name()
                    ))
                    .into());
                };
                if obj.borrow_mut().private.remove(name).is_some() {
                    Ok(())
                } else {
                    Err(no_attribute("private namespace", self.interner.lookup(*name)).into())
                }
            }
            _ => Err(type_error("'del' target must be a name or attribute").into()),
        }
    }

    fn eval_assign(&mut self, target: &Expr, value: Value) -> Result<(), Signal> {
        match &target.kind {
            ExprKind::Ident(name) => self.assign_name(*name, value, target.span),
            ExprKind::DynamicId(inner) => {
                let name = self.eval_dynamic_name(inner)?;
                self.assign_name(name, value, target.span)
            }
            ExprKind::GetAttr {
                target: object,
                name,
            } => {
                let object_value = self.eval_expr(object)?;
                set_attr(self, &object_value, *name, value)
            }
            ExprKind::GetPriv {
                target: object,
                name,
            } => {
                let object_value = self.eval_expr(object)?;
                self.check_priv_access(&object_value)?;
                let Value::Object(obj) = &object_value else {
                    return Err(type_error(format!(
                        "{} has no private attributes",
                        object_value.type_name()
                    ))
                    .into());
                };
                obj.borrow_mut().private.insert(*name, value);
                Ok(())
            }
            ExprKind::Call {
                callee,
                args,
                kwargs,
                alt: true,
            } => {
                if args.len() != 1 || !kwargs.is_empty() {
                    return Err(type_error("subscript assignment takes exactly one index").into());
                }
                let container = self.eval_expr(callee)?;
                let index = self.eval_expr(&args[0])?;
                self.assign_subscript(&container, index, value)
            }
            _ => Err(type_error("invalid assignment target").into()),
        }
    }

    fn assign_name(&mut self, name: Name, value: Value, span: Span) -> Result<(), Signal> {
        if self.env.assign(name, value.clone())? {
            return Ok(());
        }
        // Builtins are the outermost frame of the walk.
        if self.builtins.contains_key(&name) {
            self.builtins.insert(name, value);
            return Ok(());
        }
        Err(self.attach(
            assign_undeclared(self.interner.lookup(name)).into(),
            span,
        ))
    }

    /// Index assignment is kind-dispatched directly: the protocol table
    /// has no setter slot.
    fn assign_subscript(
        &mut self,
        container: &Value,
        index: Value,
        value: Value,
    ) -> Result<(), Signal> {
        match container {
            Value::List(items) => {
                let Value::Num(idx) = index else {
                    return Err(type_error(format!(
                        "list index must be a Num, got {}",
                        index.type_name()
                    ))
                    .into());
                };
                let len = items.borrow().len();
                let resolved = crate::dispatch::resolve_list_index(idx, len)?;
                items.borrow_mut()[resolved] = value;
                Ok(())
            }
            Value::Dict(dict) => {
                dict_insert(self, dict, index, value)?;
                Ok(())
            }
            Value::Tuple(_) => Err(type_error("Tuple does not support item assignment").into()),
            other => Err(type_error(format!(
                "{} does not support item assignment",
                other.type_name()
            ))
            .into()),
        }
    }

    // Formatting

    fn eval_format(&mut self, parts: &[FormatPart]) -> EvalResult {
        let mut out = String::new();
        for part in parts {
            match part {
                FormatPart::Text(text) => out.push_str(self.interner.lookup(*text)),
                FormatPart::Expr(expr, spec) => {
                    let value = self.eval_expr(expr)?;
                    let args = match spec {
                        Some(spec) => {
                            CallArgs::positional(vec![Value::str(self.interner.lookup(*spec))])
                        }
                        None => CallArgs::default(),
                    };
                    match invoke_spec(self, &value, SpecName::Format, args)? {
                        Value::Str(s) => out.push_str(&s),
                        other => {
                            return Err(type_error(format!(
                                "'format' must return a Str, got {}",
                                other.type_name()
                            ))
                            .into())
                        }
                    }
                }
            }
        }
        Ok(Value::str(out))
    }

    // Closures and types

    fn make_closure(&mut self, name: Option<Name>, func: &quill_ir::FuncLit) -> FuncValue {
        let params = func
            .params
            .iter()
            .map(|p| ParamSpec {
                name: p.name,
                kind: p.kind,
                default: p
                    .default
                    .clone()
                    .map(|expr| ParamDefault::Expr(Rc::new(expr))),
            })
            .collect();
        FuncValue::closure(
            name,
            params,
            Rc::from(func.body.clone().into_boxed_slice()),
            self.env.current(),
        )
    }

    /// `pub type Name { ... }` — the body runs in a fresh scope; the
    /// resulting scope object becomes the type's prototype, its `init`
    /// (if declared) the constructor.
    fn eval_type_decl(&mut self, name: Name, body: &[Stmt]) -> EvalResult {
        let proto = self.with_scope_capture(|interp| interp.eval_stmts(body))?;
        if let Value::Object(obj) = &proto {
            obj.borrow_mut().name = Some(name);
        }
        let init = match &proto {
            Value::Object(obj) => obj.borrow().public.get(&self.names.init).cloned(),
            _ => None,
        };
        Ok(Value::type_value(crate::value::TypeValue::user(
            name, proto, init,
        )))
    }

    // Scope helpers. Pop runs on every exit path: the closure returns a
    // Result and the pop happens after it, unconditionally.

    pub(crate) fn with_child_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Signal>,
    ) -> Result<T, Signal> {
        self.env.push_child();
        let result = f(self);
        self.env.pop();
        result
    }

    pub(crate) fn with_scope_value<T>(
        &mut self,
        scope: Value,
        f: impl FnOnce(&mut Self) -> Result<T, Signal>,
    ) -> Result<T, Signal> {
        self.env.push_value(scope);
        let result = f(self);
        self.env.pop();
        result
    }

    /// Like `with_child_scope`, but hands back the scope object itself.
    fn with_scope_capture(
        &mut self,
        f: impl FnOnce(&mut Self) -> EvalResult,
    ) -> Result<Value, Signal> {
        self.env.push_child();
        let result = f(self);
        let scope = self.env.current();
        self.env.pop();
        result?;
        Ok(scope)
    }

    // Error-frame plumbing

    pub(crate) fn error_frame(&self, span: Span, context: Option<String>) -> TraceFrame {
        TraceFrame {
            span,
            filename: self.filename.clone(),
            source: self.source.clone(),
            context,
        }
    }

    /// Give an unlocated error its innermost frame.
    fn attach(&self, signal: Signal, span: Span) -> Signal {
        match signal {
            Signal::Error(mut err) => {
                if !err.has_location() {
                    err.push_frame(self.error_frame(span, None));
                }
                Signal::Error(err)
            }
            other => other,
        }
    }

    /// Stack a call-site frame onto an error unwinding through a call.
    fn attach_call(&self, signal: Signal, span: Span, callee: &Value) -> Signal {
        match signal {
            Signal::Error(mut err) => {
                let context = match callee {
                    Value::Func(f) => Some(format!("in {}", f.describe(&self.interner))),
                    Value::Type(t) => Some(format!(
                        "constructing {}",
                        self.interner.lookup(t.borrow().name)
                    )),
                    _ => None,
                };
                err.push_frame(self.error_frame(span, context));
                Signal::Error(err)
            }
            other => other,
        }
    }
}
