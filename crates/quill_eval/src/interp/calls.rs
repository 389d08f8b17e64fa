//! Function calls: parameter binding, scope setup, type construction.

use std::collections::VecDeque;
use std::mem;

use quill_ir::{Name, ParamKind, Vis};

use crate::context::NativeContext;
use crate::dispatch::{dict_insert, invoke_spec};
use crate::env::Environment;
use crate::errors::{
    argument_not_passed, control_outside, extra_keyword, extra_positional,
    keyword_for_positional_only, not_callable, recursion_limit, type_error, value_error,
};
use crate::interp::Interpreter;
use crate::signal::{EvalResult, Signal};
use crate::spec::SpecName;
use crate::value::{
    CallArgs, DictValue, FuncBody, FuncValue, ObjectValue, ParamDefault, Shared, Value, ValueTag,
};

/// Ceiling on nested calls. Deep recursion grows the host stack safely,
/// but a runaway program still has to stop somewhere — with a typed,
/// catchable error rather than an abort.
const MAX_CALL_DEPTH: usize = 8_192;

impl Interpreter {
    /// Call anything callable: functions directly, everything else
    /// through its `call` slot.
    pub fn call_callable(&mut self, callable: &Value, args: CallArgs) -> EvalResult {
        match callable {
            Value::Func(f) => self.call_function(f, args),
            other => invoke_spec(self, other, SpecName::Call, args),
        }
    }

    pub fn call_function(&mut self, func: &FuncValue, args: CallArgs) -> EvalResult {
        self.call_function_with_extras(func, args, &[])
    }

    /// Call with additional bindings injected into the call scope ahead
    /// of parameter binding (`self` during type construction).
    pub fn call_function_with_extras(
        &mut self,
        func: &FuncValue,
        args: CallArgs,
        extras: &[(Name, Value)],
    ) -> EvalResult {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(recursion_limit(MAX_CALL_DEPTH).into());
        }

        // Pre-bound partial arguments go ahead of call-site positionals;
        // call-site keywords override partial keywords.
        let mut positional = func.partial_args.clone();
        positional.extend(args.args);
        let mut keywords = func.partial_kwargs.clone();
        for (name, value) in args.kwargs {
            if let Some(existing) = keywords.iter_mut().find(|(n, _)| *n == name) {
                existing.1 = value;
            } else {
                keywords.push((name, value));
            }
        }

        match &func.body {
            FuncBody::Native { func: native, .. } => {
                let native = native.clone();
                self.depth += 1;
                let result = native(
                    &mut NativeContext::new(self),
                    CallArgs {
                        args: positional,
                        kwargs: keywords,
                    },
                );
                self.depth -= 1;
                result
            }
            FuncBody::Ast(body) => {
                let body = body.clone();
                let parent = func
                    .parent_scope
                    .clone()
                    .unwrap_or_else(|| self.env.global());
                let call_scope = Value::object(ObjectValue::with_parent(parent));
                let saved = mem::replace(&mut self.env, Environment::rooted(call_scope));
                self.depth += 1;

                let result = (|| {
                    for (name, value) in extras {
                        self.env.declare(Vis::Pub, *name, value.clone());
                    }
                    self.bind_parameters(func, positional, keywords)?;
                    self.eval_stmts(&body)
                })();

                self.depth -= 1;
                self.env = saved;

                match result {
                    // The implicit result is the last statement's value.
                    Ok(value) => Ok(value),
                    Err(Signal::Return(value)) => Ok(value),
                    // Loop signals never cross a call boundary.
                    Err(Signal::Break(_)) => Err(control_outside("break", "loop").into()),
                    Err(Signal::Continue(_)) => Err(control_outside("continue", "loop").into()),
                    Err(other) => Err(other),
                }
            }
        }
    }

    /// Bind declared parameters against the merged arguments, declaring
    /// each into the current (call) scope.
    ///
    /// Walks parameters in declaration order. A vararg greedily takes
    /// all remaining positionals; a varkwarg takes all remaining
    /// keywords. Everything else prefers the next positional (unless
    /// keyword-only), then a keyword by name (unless positional-only),
    /// then the default expression — evaluated lazily, per call, in the
    /// call scope so earlier parameters are visible to later defaults.
    fn bind_parameters(
        &mut self,
        func: &FuncValue,
        positional: Vec<Value>,
        keywords: Vec<(Name, Value)>,
    ) -> Result<(), Signal> {
        let desc = func.describe(&self.interner);
        let mut positional: VecDeque<Value> = positional.into();
        let mut keywords = keywords;

        for param in &func.params {
            match param.kind {
                ParamKind::Vararg => {
                    let rest: Vec<Value> = positional.drain(..).collect();
                    self.env.declare(Vis::Pub, param.name, Value::list(rest));
                }
                ParamKind::Varkwarg => {
                    let dict = Shared::new(DictValue::new());
                    for (name, value) in keywords.drain(..) {
                        let key = Value::str(self.interner.lookup(name));
                        dict_insert(self, &dict, key, value)?;
                    }
                    self.env.declare(Vis::Pub, param.name, Value::Dict(dict));
                }
                ParamKind::Arg | ParamKind::ArgOrKwarg | ParamKind::Kwarg => {
                    let keyword_idx = keywords.iter().position(|(n, _)| *n == param.name);
                    let value = if !positional.is_empty() {
                        if param.kind == ParamKind::Kwarg {
                            return Err(extra_positional(&desc).into());
                        }
                        if keyword_idx.is_some() {
                            return Err(type_error(format!(
                                "{desc} got multiple values for '{}'",
                                self.interner.lookup(param.name)
                            ))
                            .into());
                        }
                        positional.pop_front().unwrap_or(Value::Null)
                    } else if let Some(idx) = keyword_idx {
                        if param.kind == ParamKind::Arg {
                            return Err(keyword_for_positional_only(
                                &desc,
                                self.interner.lookup(param.name),
                            )
                            .into());
                        }
                        keywords.remove(idx).1
                    } else if let Some(default) = &param.default {
                        match default {
                            ParamDefault::Expr(expr) => self.eval_expr(expr)?,
                            ParamDefault::Value(value) => value.clone(),
                        }
                    } else {
                        return Err(argument_not_passed(
                            &desc,
                            self.interner.lookup(param.name),
                        )
                        .into());
                    };
                    self.env.declare(Vis::Pub, param.name, value);
                }
            }
        }

        if !positional.is_empty() {
            return Err(extra_positional(&desc).into());
        }
        if let Some((name, _)) = keywords.first() {
            return Err(extra_keyword(&desc, self.interner.lookup(*name)).into());
        }
        Ok(())
    }

    /// Call a type value: construct an instance (user types), convert
    /// (builtin types), or build an error value (error types).
    pub fn construct_type(&mut self, type_value: &Value, args: CallArgs) -> EvalResult {
        let Value::Type(t) = type_value else {
            return Err(not_callable(type_value.type_name()).into());
        };
        let (name, builtin, error_kind, is_union, proto, init) = {
            let borrow = t.borrow();
            (
                borrow.name,
                borrow.builtin,
                borrow.error_kind,
                borrow.is_union(),
                borrow.proto.clone(),
                borrow.init.clone(),
            )
        };

        if is_union {
            return Err(type_error("cannot construct a union type").into());
        }
        if let Some(tag) = builtin {
            return self.construct_builtin(tag, args);
        }
        if let Some(kind) = error_kind {
            let message = match args.args.first() {
                None => String::new(),
                Some(value) => crate::dispatch::str_of(self, value)?,
            };
            return Ok(Value::error(crate::value::ErrorValue::new(kind, message)));
        }

        // User type: fresh instance wired to the type and its prototype,
        // then `init` runs with `self` injected as an extra binding.
        let mut instance = ObjectValue::named(name);
        instance.specs.insert(SpecName::Type, type_value.clone());
        if let Some(proto) = proto {
            instance.specs.insert(SpecName::Parent, proto);
        }
        let instance = Value::object(instance);

        match init {
            Some(Value::Func(f)) => {
                // `init` runs with the instance chained into its scope
                // (the instance's own parent is the prototype, so the
                // defining chain stays reachable) and bound as `self`.
                let mut init_fn = (*f).clone();
                init_fn.parent_scope = Some(instance.clone());
                self.call_function_with_extras(
                    &init_fn,
                    args,
                    &[(self.names.self_, instance.clone())],
                )?;
            }
            Some(other) => {
                return Err(type_error(format!(
                    "'init' of type {} must be a function, got {}",
                    self.interner.lookup(name),
                    other.type_name()
                ))
                .into())
            }
            None => {
                if !args.is_empty() {
                    return Err(type_error(format!(
                        "type {} takes no arguments",
                        self.interner.lookup(name)
                    ))
                    .into());
                }
            }
        }
        Ok(instance)
    }

    /// Builtin types double as conversion functions.
    fn construct_builtin(&mut self, tag: ValueTag, args: CallArgs) -> EvalResult {
        match tag {
            ValueTag::Object => {
                if !args.is_empty() {
                    return Err(type_error("Object() takes no arguments").into());
                }
                Ok(Value::object(ObjectValue::new()))
            }
            ValueTag::Dict => {
                if !args.is_empty() {
                    return Err(type_error("Dict() takes no arguments").into());
                }
                Ok(Value::dict(DictValue::new()))
            }
            ValueTag::Num => {
                let arg = one_arg("Num", args)?;
                match &arg {
                    Value::Num(n) => Ok(Value::num(*n)),
                    Value::Bool(b) => Ok(Value::num(f64::from(*b))),
                    Value::Str(s) => s
                        .trim()
                        .parse::<f64>()
                        .map(Value::num)
                        .map_err(|_| {
                            Signal::from(value_error(format!(
                                "cannot convert {:?} to Num",
                                s.as_str()
                            )))
                        }),
                    other => Err(type_error(format!(
                        "cannot convert {} to Num",
                        other.type_name()
                    ))
                    .into()),
                }
            }
            ValueTag::Str => {
                let arg = one_arg("Str", args)?;
                Ok(Value::str(crate::dispatch::str_of(self, &arg)?))
            }
            ValueTag::Bool => {
                let arg = one_arg("Bool", args)?;
                Ok(Value::Bool(crate::dispatch::truthy(self, &arg)?))
            }
            ValueTag::List => {
                let arg = one_arg("List", args)?;
                Ok(Value::list(self.collect_iterable(&arg)?))
            }
            ValueTag::Tuple => {
                let arg = one_arg("Tuple", args)?;
                Ok(Value::tuple(self.collect_iterable(&arg)?))
            }
            other => Err(type_error(format!("cannot construct {}", other.name())).into()),
        }
    }

    /// Drain an iterable into a host vector via `iter`/`next`.
    pub(crate) fn collect_iterable(&mut self, value: &Value) -> Result<Vec<Value>, Signal> {
        let iterator = crate::dispatch::make_iterator(self, value)?;
        let mut out = Vec::new();
        loop {
            match invoke_spec(self, &iterator, SpecName::Next, CallArgs::default()) {
                Ok(item) => out.push(item),
                Err(Signal::StopIteration) => break,
                Err(other) => return Err(other),
            }
        }
        Ok(out)
    }
}

fn one_arg(what: &str, args: CallArgs) -> Result<Value, Signal> {
    if args.args.len() != 1 || !args.kwargs.is_empty() {
        return Err(type_error(format!("{what}() takes exactly one argument")).into());
    }
    Ok(args.args.into_iter().next().unwrap_or(Value::Null))
}
