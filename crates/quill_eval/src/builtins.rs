//! The builtins namespace.
//!
//! Built explicitly at interpreter construction — no lazy global state.
//! Consulted by name lookup after the scope chain, so user declarations
//! shadow builtins without touching them.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use quill_ir::{Name, SharedInterner};

use crate::context::{expect_arity, NativeContext};
use crate::dispatch::{repr_of, str_of, truthy};
use crate::errors::{assertion_failed, type_error, value_error, ErrorKind};
use crate::signal::{EvalResult, Signal};
use crate::spec::SpecName;
use crate::value::{CallArgs, FuncValue, IterState, TypeValue, Value, ValueTag};

fn native(
    name: &'static str,
    f: impl Fn(&mut NativeContext<'_>, CallArgs) -> EvalResult + 'static,
) -> Value {
    Value::func(FuncValue::native(name, Rc::new(f)))
}

/// Build the builtins map and the kind-to-type table.
pub(crate) fn build(
    interner: &SharedInterner,
) -> (FxHashMap<Name, Value>, FxHashMap<ValueTag, Value>) {
    let mut builtins: FxHashMap<Name, Value> = FxHashMap::default();
    let mut builtin_types: FxHashMap<ValueTag, Value> = FxHashMap::default();

    // Kind types. List/Tuple take one erased element parameter, Dict a
    // key and value pair.
    let kind_types: &[(&str, ValueTag, Option<usize>)] = &[
        ("Null", ValueTag::Null, None),
        ("Bool", ValueTag::Bool, None),
        ("Num", ValueTag::Num, None),
        ("Str", ValueTag::Str, None),
        ("List", ValueTag::List, Some(1)),
        ("Tuple", ValueTag::Tuple, None),
        ("Dict", ValueTag::Dict, Some(2)),
        ("Func", ValueTag::Func, None),
        ("Property", ValueTag::Property, None),
        ("Type", ValueTag::Type, None),
        ("Object", ValueTag::Object, None),
        ("Iterator", ValueTag::Iterator, None),
        ("Error", ValueTag::Error, None),
    ];
    for (name, tag, arity) in kind_types {
        let interned = interner.intern(name);
        let mut type_value = TypeValue::builtin(interned, *tag);
        if let Some(arity) = arity {
            type_value = type_value.with_arity(*arity);
        }
        let value = Value::type_value(type_value);
        builtins.insert(interned, value.clone());
        builtin_types.insert(*tag, value);
    }

    // Error types, usable both as constructors and as catch filters.
    let error_types: &[(&str, ErrorKind)] = &[
        ("NameError", ErrorKind::NameError),
        ("ValueError", ErrorKind::ValueError),
        ("TypeError", ErrorKind::TypeError),
        ("AttributeError", ErrorKind::AttributeError),
        ("KeyError", ErrorKind::KeyError),
        ("IndexError", ErrorKind::IndexError),
        ("SyntaxError", ErrorKind::SyntaxError),
        ("ImportError", ErrorKind::ImportError),
        ("VersionConflict", ErrorKind::VersionConflict),
        ("AssertionError", ErrorKind::AssertionError),
        ("ScopeError", ErrorKind::ScopeError),
        ("RecursionError", ErrorKind::RecursionError),
    ];
    for (name, kind) in error_types {
        let interned = interner.intern(name);
        builtins.insert(
            interned,
            Value::type_value(TypeValue::error(interned, *kind)),
        );
    }

    // Functions.
    let functions: &[(&str, Value)] = &[
        (
            "print",
            native("print", |ctx, args| {
                let mut parts = Vec::with_capacity(args.args.len());
                for arg in &args.args {
                    parts.push(str_of(ctx.interp, arg)?);
                }
                ctx.interp.printer().print(&parts.join(" "));
                Ok(Value::Null)
            }),
        ),
        (
            "len",
            native("len", |_ctx, args| {
                expect_arity("len", &args, 1)?;
                let count = match &args.args[0] {
                    Value::Str(s) => s.chars().count(),
                    Value::List(items) => items.borrow().len(),
                    Value::Tuple(items) => items.len(),
                    Value::Dict(dict) => dict.borrow().len(),
                    other => {
                        return Err(type_error(format!(
                            "len is not defined for {}",
                            other.type_name()
                        ))
                        .into())
                    }
                };
                Ok(Value::num(count as f64))
            }),
        ),
        (
            "not",
            native("not", |ctx, args| {
                expect_arity("not", &args, 1)?;
                Ok(Value::Bool(!truthy(ctx.interp, &args.args[0])?))
            }),
        ),
        (
            "range",
            native("range", |ctx, args| {
                if args.args.is_empty() || args.args.len() > 3 || !args.kwargs.is_empty() {
                    return Err(type_error("range takes 1 to 3 arguments").into());
                }
                let mut nums = Vec::with_capacity(3);
                for i in 0..args.args.len() {
                    nums.push(ctx.num_arg(&args, i, "range")?);
                }
                let (start, end, step) = match nums.as_slice() {
                    [end] => (0.0, *end, 1.0),
                    [start, end] => (*start, *end, 1.0),
                    [start, end, step] => (*start, *end, *step),
                    _ => unreachable!(),
                };
                if step == 0.0 {
                    return Err(value_error("range step must not be zero").into());
                }
                Ok(Value::iterator(IterState::Range {
                    next: start,
                    end,
                    step,
                }))
            }),
        ),
        (
            "type_of",
            native("type_of", |ctx, args| {
                expect_arity("type_of", &args, 1)?;
                let value = args.args[0].clone();
                ctx.invoke_spec(&value, SpecName::Type, CallArgs::default())
            }),
        ),
        (
            "repr",
            native("repr", |ctx, args| {
                expect_arity("repr", &args, 1)?;
                Ok(Value::str(repr_of(ctx.interp, &args.args[0])?))
            }),
        ),
        (
            "str",
            native("str", |ctx, args| {
                expect_arity("str", &args, 1)?;
                Ok(Value::str(str_of(ctx.interp, &args.args[0])?))
            }),
        ),
        (
            "num",
            native("num", |_ctx, args| {
                expect_arity("num", &args, 1)?;
                match &args.args[0] {
                    Value::Num(n) => Ok(Value::num(*n)),
                    Value::Bool(b) => Ok(Value::num(f64::from(*b))),
                    Value::Str(s) => s.trim().parse::<f64>().map(Value::num).map_err(|_| {
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
            }),
        ),
        (
            "assert",
            native("assert", |ctx, args| {
                if args.args.is_empty() || args.args.len() > 2 {
                    return Err(
                        type_error("assert takes a condition and an optional message").into()
                    );
                }
                if truthy(ctx.interp, &args.args[0])? {
                    return Ok(Value::Null);
                }
                let message = match args.args.get(1) {
                    Some(value) => str_of(ctx.interp, value)?,
                    None => "condition is false".to_string(),
                };
                Err(assertion_failed(&message).into())
            }),
        ),
    ];
    for (name, value) in functions {
        builtins.insert(interner.intern(name), value.clone());
    }

    (builtins, builtin_types)
}
