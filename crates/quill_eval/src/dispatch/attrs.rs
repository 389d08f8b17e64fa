//! The `get_attr` slot: attribute access defaults per kind.
//!
//! Objects resolve through their public attributes and parent chain.
//! The built-in kinds expose method surfaces here as natives bound to
//! their receiver — the string/list/dict method sets live entirely in
//! this file.

use std::rc::Rc;

use crate::context::{expect_arity, NativeContext};
use crate::dispatch::{
    dict_contains, dict_get, dict_remove, invoke_spec, str_of, values_equal,
};
use crate::errors::{index_out_of_bounds, no_attribute, type_error, value_error};
use crate::interp::Interpreter;
use crate::signal::{EvalResult, Signal};
use crate::spec::SpecName;
use crate::value::{CallArgs, FuncValue, Value};

const MAX_PROTO_HOPS: usize = 10_000;

pub(super) fn eval(interp: &mut Interpreter, value: &Value, args: CallArgs) -> EvalResult {
    let attr = match args.args.first() {
        Some(Value::Str(s)) => s.as_str().to_string(),
        _ => return Err(type_error("'get_attr' takes the attribute name as a Str").into()),
    };
    get_attr_default(interp, value, &attr)
}

fn get_attr_default(interp: &mut Interpreter, value: &Value, attr: &str) -> EvalResult {
    match value {
        Value::Object(_) => object_attr(interp, value, attr),
        Value::Type(_) => type_attr(interp, value, attr),
        Value::Str(_) => str_method(value, attr)
            .ok_or_else(|| missing(interp, value, attr))
            .map_err(Into::into),
        Value::List(_) => list_method(value, attr)
            .ok_or_else(|| missing(interp, value, attr))
            .map_err(Into::into),
        Value::Dict(_) => dict_method(value, attr)
            .ok_or_else(|| missing(interp, value, attr))
            .map_err(Into::into),
        Value::Num(_) => num_method(value, attr)
            .ok_or_else(|| missing(interp, value, attr))
            .map_err(Into::into),
        Value::Error(e) => match attr {
            "message" => Ok(Value::str(e.message.clone())),
            "kind" => Ok(Value::str(e.kind.name())),
            "payload" => Ok(e.payload.clone().unwrap_or(Value::Null)),
            _ => Err(missing(interp, value, attr).into()),
        },
        Value::Iterator(_) => match attr {
            "next" => Ok(iterator_next_method(value)),
            _ => Err(missing(interp, value, attr).into()),
        },
        _ => Err(missing(interp, value, attr).into()),
    }
}

fn missing(interp: &Interpreter, value: &Value, attr: &str) -> crate::errors::RuntimeError {
    let shown = match value {
        Value::Object(obj) => match obj.borrow().name {
            Some(name) => interp.interner.lookup(name).to_string(),
            None => "Object".to_string(),
        },
        other => other.type_name().to_string(),
    };
    no_attribute(&shown, attr)
}

/// Public attributes, walking the parent chain (prototype lookup).
///
/// A function whose first parameter is `self` comes back as a bound
/// method: the receiver is pre-applied and chained into its scope.
fn object_attr(interp: &mut Interpreter, value: &Value, attr: &str) -> EvalResult {
    let name = interp.interner.intern(attr);
    let mut cursor = value.clone();
    for _ in 0..MAX_PROTO_HOPS {
        let Value::Object(obj) = &cursor else { break };
        let found = obj.borrow().public.get(&name).cloned();
        if let Some(found) = found {
            if let Value::Func(f) = &found {
                let takes_self =
                    !f.is_native() && f.params.first().map(|p| p.name) == Some(interp.names.self_);
                if takes_self {
                    let mut bound = (**f).clone();
                    bound.parent_scope = Some(value.clone());
                    bound.partial_args.insert(0, value.clone());
                    return Ok(Value::func(bound));
                }
            }
            return Ok(found);
        }
        let parent = obj.borrow().parent();
        match parent {
            Some(p) => cursor = p,
            None => break,
        }
    }
    Err(missing(interp, value, attr).into())
}

fn type_attr(interp: &mut Interpreter, value: &Value, attr: &str) -> EvalResult {
    let Value::Type(t) = value else { unreachable!() };
    match attr {
        "name" => {
            let name = t.borrow().name;
            return Ok(Value::str(interp.interner.lookup(name)));
        }
        "check" => {
            let receiver = value.clone();
            return Ok(native_bound("Type.check", move |_ctx, args| {
                expect_arity("check", &args, 1)?;
                Ok(Value::Bool(crate::value::check_value(
                    &receiver,
                    &args.args[0],
                )))
            }));
        }
        _ => {}
    }
    // Statics declared in the type body.
    let proto = t.borrow().proto.clone();
    if let Some(proto) = proto {
        let name = interp.interner.intern(attr);
        if let Value::Object(obj) = &proto {
            if let Some(found) = obj.borrow().public.get(&name) {
                return Ok(found.clone());
            }
        }
    }
    Err(missing(interp, value, attr).into())
}

/// Assign `target.attr = value`.
pub fn set_attr(
    interp: &mut Interpreter,
    target: &Value,
    name: quill_ir::Name,
    value: Value,
) -> Result<(), Signal> {
    match target {
        Value::Object(obj) => {
            obj.borrow_mut().public.insert(name, value);
            Ok(())
        }
        Value::Type(t) => {
            let proto = t.borrow().proto.clone();
            match proto {
                Some(Value::Object(obj)) => {
                    obj.borrow_mut().public.insert(name, value);
                    Ok(())
                }
                _ => Err(type_error(format!(
                    "cannot set attribute on type {}",
                    interp.interner.lookup(t.borrow().name)
                ))
                .into()),
            }
        }
        other => Err(type_error(format!(
            "cannot set attribute on {}",
            other.type_name()
        ))
        .into()),
    }
}

/// Wrap a host closure as a bound-method value.
fn native_bound(
    name: &'static str,
    f: impl Fn(&mut NativeContext<'_>, CallArgs) -> EvalResult + 'static,
) -> Value {
    Value::func(FuncValue::native(name, Rc::new(f)))
}

// Str methods

fn str_method(receiver: &Value, attr: &str) -> Option<Value> {
    let Value::Str(s) = receiver else { return None };
    let s = s.as_str().to_string();
    Some(match attr {
        "upper" => native_bound("Str.upper", move |_ctx, args| {
            expect_arity("upper", &args, 0)?;
            Ok(Value::str(s.to_uppercase()))
        }),
        "lower" => {
            let s = s.clone();
            native_bound("Str.lower", move |_ctx, args| {
                expect_arity("lower", &args, 0)?;
                Ok(Value::str(s.to_lowercase()))
            })
        }
        "trim" => {
            let s = s.clone();
            native_bound("Str.trim", move |_ctx, args| {
                expect_arity("trim", &args, 0)?;
                Ok(Value::str(s.trim().to_string()))
            })
        }
        "split" => {
            let s = s.clone();
            native_bound("Str.split", move |_ctx, args| {
                let parts: Vec<Value> = match args.args.first() {
                    None => s.split_whitespace().map(Value::str).collect(),
                    Some(Value::Str(sep)) => {
                        s.split(sep.as_str()).map(Value::str).collect()
                    }
                    Some(other) => {
                        return Err(type_error(format!(
                            "split separator must be a Str, got {}",
                            other.type_name()
                        ))
                        .into())
                    }
                };
                Ok(Value::list(parts))
            })
        }
        "replace" => {
            let s = s.clone();
            native_bound("Str.replace", move |ctx, args| {
                expect_arity("replace", &args, 2)?;
                let from = ctx.str_arg(&args, 0, "replace")?;
                let to = ctx.str_arg(&args, 1, "replace")?;
                Ok(Value::str(s.replace(&from, &to)))
            })
        }
        "contains" => {
            let s = s.clone();
            native_bound("Str.contains", move |ctx, args| {
                expect_arity("contains", &args, 1)?;
                let needle = ctx.str_arg(&args, 0, "contains")?;
                Ok(Value::Bool(s.contains(&needle)))
            })
        }
        "starts_with" => {
            let s = s.clone();
            native_bound("Str.starts_with", move |ctx, args| {
                expect_arity("starts_with", &args, 1)?;
                let prefix = ctx.str_arg(&args, 0, "starts_with")?;
                Ok(Value::Bool(s.starts_with(&prefix)))
            })
        }
        "ends_with" => {
            let s = s.clone();
            native_bound("Str.ends_with", move |ctx, args| {
                expect_arity("ends_with", &args, 1)?;
                let suffix = ctx.str_arg(&args, 0, "ends_with")?;
                Ok(Value::Bool(s.ends_with(&suffix)))
            })
        }
        "join" => {
            let s = s.clone();
            native_bound("Str.join", move |ctx, args| {
                expect_arity("join", &args, 1)?;
                let Value::List(items) = &args.args[0] else {
                    return Err(type_error("join takes a List").into());
                };
                let snapshot = items.borrow().clone();
                let mut parts = Vec::with_capacity(snapshot.len());
                for item in &snapshot {
                    parts.push(str_of(ctx.interp, item)?);
                }
                Ok(Value::str(parts.join(&s)))
            })
        }
        _ => return None,
    })
}

// List methods

fn list_method(receiver: &Value, attr: &str) -> Option<Value> {
    let Value::List(items) = receiver else {
        return None;
    };
    let items = items.clone();
    Some(match attr {
        "push" => native_bound("List.push", move |_ctx, args| {
            expect_arity("push", &args, 1)?;
            items.borrow_mut().push(args.args[0].clone());
            Ok(Value::Null)
        }),
        "pop" => native_bound("List.pop", move |_ctx, args| {
            expect_arity("pop", &args, 0)?;
            items
                .borrow_mut()
                .pop()
                .ok_or_else(|| Signal::from(index_out_of_bounds(0.0, 0)))
        }),
        "map" => native_bound("List.map", move |ctx, args| {
            expect_arity("map", &args, 1)?;
            let f = args.args[0].clone();
            let snapshot = items.borrow().clone();
            let mut out = Vec::with_capacity(snapshot.len());
            for item in snapshot {
                out.push(ctx.interp.call_callable(&f, CallArgs::positional(vec![item]))?);
            }
            Ok(Value::list(out))
        }),
        "filter" => native_bound("List.filter", move |ctx, args| {
            expect_arity("filter", &args, 1)?;
            let f = args.args[0].clone();
            let snapshot = items.borrow().clone();
            let mut out = Vec::new();
            for item in snapshot {
                let keep = ctx
                    .interp
                    .call_callable(&f, CallArgs::positional(vec![item.clone()]))?;
                if crate::dispatch::truthy(ctx.interp, &keep)? {
                    out.push(item);
                }
            }
            Ok(Value::list(out))
        }),
        "contains" => native_bound("List.contains", move |ctx, args| {
            expect_arity("contains", &args, 1)?;
            let snapshot = items.borrow().clone();
            for candidate in &snapshot {
                if values_equal(ctx.interp, candidate, &args.args[0])? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }),
        "index_of" => native_bound("List.index_of", move |ctx, args| {
            expect_arity("index_of", &args, 1)?;
            let snapshot = items.borrow().clone();
            for (i, candidate) in snapshot.iter().enumerate() {
                if values_equal(ctx.interp, candidate, &args.args[0])? {
                    return Ok(Value::num(i as f64));
                }
            }
            Ok(Value::Null)
        }),
        "reverse" => native_bound("List.reverse", move |_ctx, args| {
            expect_arity("reverse", &args, 0)?;
            items.borrow_mut().reverse();
            Ok(Value::Null)
        }),
        "join" => native_bound("List.join", move |ctx, args| {
            expect_arity("join", &args, 1)?;
            let sep = ctx.str_arg(&args, 0, "join")?;
            let snapshot = items.borrow().clone();
            let mut parts = Vec::with_capacity(snapshot.len());
            for item in &snapshot {
                parts.push(str_of(ctx.interp, item)?);
            }
            Ok(Value::str(parts.join(&sep)))
        }),
        _ => return None,
    })
}

// Dict methods

fn dict_method(receiver: &Value, attr: &str) -> Option<Value> {
    let Value::Dict(dict) = receiver else {
        return None;
    };
    let dict = dict.clone();
    Some(match attr {
        "keys" => native_bound("Dict.keys", move |_ctx, args| {
            expect_arity("keys", &args, 0)?;
            Ok(Value::list(dict.borrow().keys()))
        }),
        "values" => native_bound("Dict.values", move |_ctx, args| {
            expect_arity("values", &args, 0)?;
            Ok(Value::list(dict.borrow().values()))
        }),
        "items" => native_bound("Dict.items", move |_ctx, args| {
            expect_arity("items", &args, 0)?;
            let entries = dict.borrow().entries().to_vec();
            Ok(Value::list(
                entries
                    .into_iter()
                    .map(|(k, v)| Value::tuple(vec![k, v]))
                    .collect(),
            ))
        }),
        "has" => native_bound("Dict.has", move |ctx, args| {
            expect_arity("has", &args, 1)?;
            Ok(Value::Bool(dict_contains(
                ctx.interp,
                &dict,
                &args.args[0],
            )?))
        }),
        "get" => native_bound("Dict.get", move |ctx, args| {
            if args.args.is_empty() || args.args.len() > 2 {
                return Err(type_error("get takes a key and an optional default").into());
            }
            match dict_get(ctx.interp, &dict, &args.args[0])? {
                Some(found) => Ok(found),
                None => Ok(args.args.get(1).cloned().unwrap_or(Value::Null)),
            }
        }),
        "remove" => native_bound("Dict.remove", move |ctx, args| {
            expect_arity("remove", &args, 1)?;
            Ok(dict_remove(ctx.interp, &dict, &args.args[0])?.unwrap_or(Value::Null))
        }),
        _ => return None,
    })
}

// Num methods

fn num_method(receiver: &Value, attr: &str) -> Option<Value> {
    let Value::Num(n) = receiver else { return None };
    let n = *n;
    let method: fn(f64) -> f64 = match attr {
        "abs" => f64::abs,
        "floor" => f64::floor,
        "ceil" => f64::ceil,
        "round" => f64::round,
        _ => return None,
    };
    Some(native_bound("Num.method", move |_ctx, args| {
        expect_arity("num method", &args, 0)?;
        Ok(Value::num(method(n)))
    }))
}

/// `it.next()` — exhaustion surfaces as a catchable error here, unlike
/// inside loops where the signal terminates iteration.
fn iterator_next_method(receiver: &Value) -> Value {
    let receiver = receiver.clone();
    native_bound("Iterator.next", move |ctx, args| {
        expect_arity("next", &args, 0)?;
        match invoke_spec(ctx.interp, &receiver, SpecName::Next, CallArgs::default()) {
            Err(Signal::StopIteration) => Err(value_error("iterator exhausted").into()),
            other => other,
        }
    })
}
