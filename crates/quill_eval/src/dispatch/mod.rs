//! Protocol dispatch.
//!
//! [`invoke_spec`] is the single entry point every operation goes
//! through: it consults the value's instance spec table (walking the
//! prototype/parent chain), and falls back to the built-in default
//! implementation for the value's kind. There is no host-language
//! operator overloading anywhere else.

mod attrs;
mod binary;
mod call;
mod format;
mod iter_ops;
mod unary;

pub use attrs::set_attr;
pub use call::type_altcall;
pub use iter_ops::make_iterator;
pub(crate) use call::resolve_index as resolve_list_index;

use crate::errors::{type_error, RuntimeError};
use crate::interp::Interpreter;
use crate::signal::{EvalResult, Signal};
use crate::spec::SpecName;
use crate::value::{CallArgs, DictValue, Shared, Value};

/// Parent hops when searching instance spec tables.
const MAX_PROTO_HOPS: usize = 10_000;

/// Find an instance spec, walking the object's parent chain.
///
/// Only `Object` values carry instance tables; every other kind goes
/// straight to the defaults.
pub fn find_spec(value: &Value, spec: SpecName) -> Result<Option<Value>, RuntimeError> {
    let Value::Object(_) = value else {
        return Ok(None);
    };
    let mut cursor = value.clone();
    for _ in 0..MAX_PROTO_HOPS {
        let Value::Object(obj) = &cursor else {
            return Ok(None);
        };
        {
            let borrow = obj.borrow();
            if let Some(found) = borrow.specs.get(&spec) {
                return Ok(Some(found.clone()));
            }
        }
        let parent = obj.borrow().parent();
        match parent {
            Some(p) => cursor = p,
            None => return Ok(None),
        }
    }
    Err(crate::errors::scope_error(
        "object parent chain is cyclic",
    ))
}

/// Invoke a protocol slot on a value.
///
/// Resolution order: instance table (with `self` prepended to the
/// arguments), then the built-in default for the value's kind, then a
/// typed `TypeError`.
pub fn invoke_spec(
    interp: &mut Interpreter,
    value: &Value,
    spec: SpecName,
    args: CallArgs,
) -> EvalResult {
    if spec.is_attr_slot() {
        // Attribute slots hold plain values, not callables.
        if let Some(stored) = find_spec(value, spec)? {
            return Ok(stored);
        }
        return Ok(match spec {
            SpecName::Type => interp.builtin_type_for(value.tag()),
            _ => Value::Null,
        });
    }

    if let Some(handler) = find_spec(value, spec)? {
        let mut call = args;
        call.args.insert(0, value.clone());
        // AST-bodied handlers run with the receiver chained into their
        // scope, so bare attribute names and `.#` access resolve on it.
        if let Value::Func(f) = &handler {
            if !f.is_native() {
                let mut rebound = (**f).clone();
                rebound.parent_scope = Some(value.clone());
                return interp.call_function(&rebound, call);
            }
        }
        return interp.call_callable(&handler, call);
    }

    dispatch_default(interp, value, spec, args)
}

/// Built-in default behaviour, dispatched on `(spec, kind)`.
fn dispatch_default(
    interp: &mut Interpreter,
    value: &Value,
    spec: SpecName,
    args: CallArgs,
) -> EvalResult {
    match spec {
        SpecName::Add
        | SpecName::Sub
        | SpecName::Mul
        | SpecName::Div
        | SpecName::Pow
        | SpecName::Eq
        | SpecName::Neq
        | SpecName::Less
        | SpecName::Grtr
        | SpecName::LessEq
        | SpecName::GrtrEq
        | SpecName::Amp
        | SpecName::Pipe
        | SpecName::HasItem => {
            let rhs = single_arg(&args, spec)?;
            binary::eval(interp, value, spec, &rhs)
        }
        SpecName::UAdd | SpecName::Neg | SpecName::Bool => unary::eval(interp, value, spec),
        SpecName::Repr | SpecName::Str | SpecName::Hash | SpecName::Format => {
            format::eval(interp, value, spec, args)
        }
        SpecName::Iter | SpecName::Next => iter_ops::eval(interp, value, spec),
        SpecName::Call | SpecName::AltCall | SpecName::Get | SpecName::Init => {
            call::eval(interp, value, spec, args)
        }
        SpecName::GetAttr => attrs::eval(interp, value, args),
        SpecName::Type | SpecName::Parent => unreachable!("attr slots handled by invoke_spec"),
    }
}

fn single_arg(args: &CallArgs, spec: SpecName) -> Result<Value, Signal> {
    if args.args.len() != 1 || !args.kwargs.is_empty() {
        return Err(type_error(format!(
            "'{}' takes exactly one operand",
            spec.as_str()
        ))
        .into());
    }
    Ok(args.args[0].clone())
}

// Re-entrant convenience wrappers. These are the only way the rest of
// the interpreter asks a value questions, so user overrides are always
// honoured.

/// Truthiness via the `bool` slot; the slot must produce a `Bool`.
pub fn truthy(interp: &mut Interpreter, value: &Value) -> Result<bool, Signal> {
    match invoke_spec(interp, value, SpecName::Bool, CallArgs::default())? {
        Value::Bool(b) => Ok(b),
        other => Err(type_error(format!(
            "'bool' must return a Bool, got {}",
            other.type_name()
        ))
        .into()),
    }
}

/// String conversion via the `str` slot.
pub fn str_of(interp: &mut Interpreter, value: &Value) -> Result<String, Signal> {
    match invoke_spec(interp, value, SpecName::Str, CallArgs::default())? {
        Value::Str(s) => Ok(s.as_str().to_string()),
        other => Err(type_error(format!(
            "'str' must return a Str, got {}",
            other.type_name()
        ))
        .into()),
    }
}

/// Debug string via the `repr` slot.
pub fn repr_of(interp: &mut Interpreter, value: &Value) -> Result<String, Signal> {
    match invoke_spec(interp, value, SpecName::Repr, CallArgs::default())? {
        Value::Str(s) => Ok(s.as_str().to_string()),
        other => Err(type_error(format!(
            "'repr' must return a Str, got {}",
            other.type_name()
        ))
        .into()),
    }
}

/// Hash via the `hash` slot; the slot must produce a `Num`.
pub fn hash_of(interp: &mut Interpreter, value: &Value) -> Result<u64, Signal> {
    match invoke_spec(interp, value, SpecName::Hash, CallArgs::default())? {
        Value::Num(n) => Ok(n.to_bits()),
        other => Err(type_error(format!(
            "'hash' must return a Num, got {}",
            other.type_name()
        ))
        .into()),
    }
}

/// Equality via the `eq` slot, collapsed to a host bool.
pub fn values_equal(interp: &mut Interpreter, a: &Value, b: &Value) -> Result<bool, Signal> {
    let result = invoke_spec(interp, a, SpecName::Eq, CallArgs::positional(vec![b.clone()]))?;
    truthy(interp, &result)
}

// Dict operations. Hashes and equality run user code, so they are
// computed while no storage borrow is held.

/// Look a key up, returning the stored value.
pub fn dict_get(
    interp: &mut Interpreter,
    dict: &Shared<DictValue>,
    key: &Value,
) -> Result<Option<Value>, Signal> {
    let hash = hash_of(interp, key)?;
    let bucket = dict.borrow().bucket(hash);
    for idx in bucket {
        let stored_key = dict.borrow().key_at(idx);
        if values_equal(interp, &stored_key, key)? {
            return Ok(Some(dict.borrow().value_at(idx)));
        }
    }
    Ok(None)
}

/// Insert or overwrite. The original key value is kept on overwrite.
pub fn dict_insert(
    interp: &mut Interpreter,
    dict: &Shared<DictValue>,
    key: Value,
    value: Value,
) -> Result<(), Signal> {
    let hash = hash_of(interp, &key)?;
    let bucket = dict.borrow().bucket(hash);
    for idx in bucket {
        let stored_key = dict.borrow().key_at(idx);
        if values_equal(interp, &stored_key, &key)? {
            dict.borrow_mut().set_value_at(idx, value);
            return Ok(());
        }
    }
    dict.borrow_mut().push_entry(hash, key, value);
    Ok(())
}

pub fn dict_contains(
    interp: &mut Interpreter,
    dict: &Shared<DictValue>,
    key: &Value,
) -> Result<bool, Signal> {
    Ok(dict_get(interp, dict, key)?.is_some())
}

/// Remove a key; returns the removed value.
///
/// Removal rebuilds the storage (it is rare — only the `remove` method
/// reaches here), which keeps the hot-path operations index-stable.
pub fn dict_remove(
    interp: &mut Interpreter,
    dict: &Shared<DictValue>,
    key: &Value,
) -> Result<Option<Value>, Signal> {
    let hash = hash_of(interp, key)?;
    let bucket = dict.borrow().bucket(hash);
    let mut found = None;
    for idx in bucket {
        let stored_key = dict.borrow().key_at(idx);
        if values_equal(interp, &stored_key, key)? {
            found = Some(idx);
            break;
        }
    }
    let Some(remove_idx) = found else {
        return Ok(None);
    };
    let removed = dict.borrow().value_at(remove_idx);
    let entries: Vec<(Value, Value)> = dict.borrow().entries().to_vec();
    let mut rebuilt = DictValue::new();
    for (i, (k, v)) in entries.into_iter().enumerate() {
        if i == remove_idx {
            continue;
        }
        let h = hash_of(interp, &k)?;
        rebuilt.push_entry(h, k, v);
    }
    *dict.borrow_mut() = rebuilt;
    Ok(Some(removed))
}
