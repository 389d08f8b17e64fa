//! The calling-convention slots: `call`, `altcall`, `get`, `init`.
//!
//! The same syntactic position means different things per kind:
//! brackets index a collection, partially apply an AST function, invoke
//! a native, and parameterize a type. The slot names a position; the
//! kind decides its meaning.

use crate::dispatch::dict_get;
use crate::errors::{
    index_out_of_bounds, key_not_found, not_callable, spec_not_defined, type_error, value_error,
};
use crate::interp::Interpreter;
use crate::signal::{EvalResult, Signal};
use crate::spec::SpecName;
use crate::value::{CallArgs, Value};

pub(super) fn eval(
    interp: &mut Interpreter,
    value: &Value,
    spec: SpecName,
    args: CallArgs,
) -> EvalResult {
    match spec {
        SpecName::Call => match value {
            Value::Func(f) => interp.call_function(f, args),
            Value::Type(_) => interp.construct_type(value, args),
            _ => Err(not_callable(value.type_name()).into()),
        },
        SpecName::AltCall => altcall(interp, value, args),
        SpecName::Get => match value {
            // Properties auto-invoke their zero-argument body on read.
            Value::Property(f) => interp.call_function(f, CallArgs::default()),
            other => Ok(other.clone()),
        },
        SpecName::Init => Err(spec_not_defined("init", value.type_name()).into()),
        _ => unreachable!("non-call spec routed to call::eval"),
    }
}

fn altcall(interp: &mut Interpreter, value: &Value, args: CallArgs) -> EvalResult {
    match value {
        Value::Func(f) => {
            if f.is_native() {
                // Natives have no currying surface; brackets invoke.
                interp.call_function(f, args)
            } else {
                Ok(Value::func(f.with_partial(args)))
            }
        }
        Value::List(items) => {
            let idx = index_arg(&args)?;
            let snapshot = items.borrow();
            let resolved = resolve_index(idx, snapshot.len())?;
            Ok(snapshot[resolved].clone())
        }
        Value::Tuple(items) => {
            let idx = index_arg(&args)?;
            let resolved = resolve_index(idx, items.len())?;
            Ok(items[resolved].clone())
        }
        Value::Str(s) => {
            let idx = index_arg(&args)?;
            let chars: Vec<char> = s.chars().collect();
            let resolved = resolve_index(idx, chars.len())?;
            Ok(Value::str(chars[resolved].to_string()))
        }
        Value::Dict(dict) => {
            let key = single_key(&args)?;
            match dict_get(interp, dict, &key)? {
                Some(found) => Ok(found),
                None => {
                    let shown = crate::dispatch::repr_of(interp, &key)?;
                    Err(key_not_found(&shown).into())
                }
            }
        }
        Value::Type(_) => type_altcall(interp, value, &args),
        _ => Err(spec_not_defined("altcall", value.type_name()).into()),
    }
}

fn single_key(args: &CallArgs) -> Result<Value, Signal> {
    if args.args.len() != 1 || !args.kwargs.is_empty() {
        return Err(type_error("subscript takes exactly one argument").into());
    }
    Ok(args.args[0].clone())
}

fn index_arg(args: &CallArgs) -> Result<f64, Signal> {
    match single_key(args)? {
        Value::Num(n) => Ok(n),
        other => Err(type_error(format!(
            "index must be a Num, got {}",
            other.type_name()
        ))
        .into()),
    }
}

/// Integral index with negative-from-the-end support.
pub(crate) fn resolve_index(idx: f64, len: usize) -> Result<usize, Signal> {
    if idx.fract() != 0.0 {
        return Err(value_error("index must be an integer").into());
    }
    let resolved = if idx < 0.0 {
        idx + len as f64
    } else {
        idx
    };
    if resolved < 0.0 || resolved >= len as f64 {
        return Err(index_out_of_bounds(idx, len).into());
    }
    Ok(resolved as usize)
}

/// `T[...]` — generic parameters are erased; only the declared arity is
/// enforced, and the base type is the result.
pub fn type_altcall(interp: &mut Interpreter, type_value: &Value, args: &CallArgs) -> EvalResult {
    let Value::Type(t) = type_value else {
        return Err(not_callable(type_value.type_name()).into());
    };
    let (name, arity) = {
        let borrow = t.borrow();
        (borrow.name, borrow.arity)
    };
    match arity {
        Some(expected) if args.args.len() == expected && args.kwargs.is_empty() => {
            Ok(type_value.clone())
        }
        Some(expected) => Err(type_error(format!(
            "type {} takes {} parameter{}, got {}",
            interp.interner.lookup(name),
            expected,
            if expected == 1 { "" } else { "s" },
            args.args.len()
        ))
        .into()),
        None => Err(type_error(format!(
            "type {} does not take parameters",
            interp.interner.lookup(name)
        ))
        .into()),
    }
}
