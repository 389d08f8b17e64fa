//! Default binary operator implementations.
//!
//! Same-kind checks live inside each implementation: `Num` arithmetic
//! requires the other operand to be numeric, and so on. The one
//! deliberate coercion is `Str` addition, which pulls the other operand
//! through its `str` slot.

use crate::dispatch::{dict_contains, dict_get, dict_insert, str_of, truthy, values_equal};
use crate::errors::{type_error, value_error};
use crate::interp::Interpreter;
use crate::signal::{EvalResult, Signal};
use crate::spec::SpecName;
use crate::value::{CallArgs, DictValue, Shared, TypeValue, Value};

/// Numeric view: `Bool` is a `Num` specialization with a fixed 0/1.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Num(n) => Some(*n),
        Value::Bool(b) => Some(f64::from(*b)),
        _ => None,
    }
}

fn not_defined_between(spec: SpecName, lhs: &Value, rhs: &Value) -> Signal {
    type_error(format!(
        "'{}' is not defined between {} and {}",
        spec.as_str(),
        lhs.type_name(),
        rhs.type_name()
    ))
    .into()
}

pub(super) fn eval(
    interp: &mut Interpreter,
    lhs: &Value,
    spec: SpecName,
    rhs: &Value,
) -> EvalResult {
    match spec {
        SpecName::Add => add(interp, lhs, rhs),
        SpecName::Sub => arith(lhs, spec, rhs, |a, b| Ok(a - b)),
        SpecName::Mul => mul(lhs, spec, rhs),
        SpecName::Div => arith(lhs, spec, rhs, |a, b| {
            if b == 0.0 {
                Err(value_error("division by zero").into())
            } else {
                Ok(a / b)
            }
        }),
        SpecName::Pow => arith(lhs, spec, rhs, |a, b| Ok(a.powf(b))),
        SpecName::Eq => Ok(Value::Bool(eq_default(interp, lhs, rhs)?)),
        SpecName::Neq => {
            // `neq` is always the logical negation of `eq`, including any
            // user override of `eq` on the operand.
            let eq = crate::dispatch::invoke_spec(
                interp,
                lhs,
                SpecName::Eq,
                CallArgs::positional(vec![rhs.clone()]),
            )?;
            Ok(Value::Bool(!truthy(interp, &eq)?))
        }
        SpecName::Less | SpecName::Grtr | SpecName::LessEq | SpecName::GrtrEq => {
            compare(lhs, spec, rhs)
        }
        SpecName::Amp => Err(not_defined_between(spec, lhs, rhs)),
        SpecName::Pipe => pipe(interp, lhs, rhs),
        SpecName::HasItem => has_item(interp, lhs, rhs),
        _ => unreachable!("non-binary spec routed to binary::eval"),
    }
}

fn arith(
    lhs: &Value,
    spec: SpecName,
    rhs: &Value,
    op: impl FnOnce(f64, f64) -> Result<f64, Signal>,
) -> EvalResult {
    match (as_number(lhs), as_number(rhs)) {
        (Some(a), Some(b)) => Ok(Value::num(op(a, b)?)),
        _ => Err(not_defined_between(spec, lhs, rhs)),
    }
}

fn add(interp: &mut Interpreter, lhs: &Value, rhs: &Value) -> EvalResult {
    if let (Some(a), Some(b)) = (as_number(lhs), as_number(rhs)) {
        return Ok(Value::num(a + b));
    }
    match (lhs, rhs) {
        // The one implicit coercion: string concatenation stringifies
        // the other operand.
        (Value::Str(a), _) => {
            let b = str_of(interp, rhs)?;
            Ok(Value::str(format!("{}{}", a.as_str(), b)))
        }
        (Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        (Value::Tuple(a), Value::Tuple(b)) => {
            let mut items: Vec<Value> = a.iter().cloned().collect();
            items.extend(b.iter().cloned());
            Ok(Value::tuple(items))
        }
        _ => Err(not_defined_between(SpecName::Add, lhs, rhs)),
    }
}

fn mul(lhs: &Value, spec: SpecName, rhs: &Value) -> EvalResult {
    if let (Some(a), Some(b)) = (as_number(lhs), as_number(rhs)) {
        return Ok(Value::num(a * b));
    }
    match (lhs, rhs) {
        (Value::Str(s), Value::Num(n)) => {
            let count = repeat_count(*n)?;
            Ok(Value::str(s.as_str().repeat(count)))
        }
        (Value::List(items), Value::Num(n)) => {
            let count = repeat_count(*n)?;
            let base = items.borrow().clone();
            let mut out = Vec::with_capacity(base.len() * count);
            for _ in 0..count {
                out.extend(base.iter().cloned());
            }
            Ok(Value::list(out))
        }
        _ => Err(not_defined_between(spec, lhs, rhs)),
    }
}

fn repeat_count(n: f64) -> Result<usize, Signal> {
    if n < 0.0 || n.fract() != 0.0 {
        return Err(value_error("repeat count must be a non-negative integer").into());
    }
    Ok(n as usize)
}

/// Default equality: value comparison for the kinds that need it,
/// reference identity for everything else.
pub(super) fn eq_default(
    interp: &mut Interpreter,
    lhs: &Value,
    rhs: &Value,
) -> Result<bool, Signal> {
    if let (Some(a), Some(b)) = (as_number(lhs), as_number(rhs)) {
        return Ok(a == b);
    }
    match (lhs, rhs) {
        (Value::Null, Value::Null) => Ok(true),
        (Value::Str(a), Value::Str(b)) => Ok(a.as_str() == b.as_str()),
        (Value::List(a), Value::List(b)) => {
            let left = a.borrow().clone();
            let right = b.borrow().clone();
            elementwise_equal(interp, &left, &right)
        }
        (Value::Tuple(a), Value::Tuple(b)) => elementwise_equal(interp, a, b),
        (Value::Dict(a), Value::Dict(b)) => {
            if a.borrow().len() != b.borrow().len() {
                return Ok(false);
            }
            let entries = a.borrow().entries().to_vec();
            for (key, value) in entries {
                match dict_get(interp, b, &key)? {
                    Some(other) => {
                        if !values_equal(interp, &value, &other)? {
                            return Ok(false);
                        }
                    }
                    None => return Ok(false),
                }
            }
            Ok(true)
        }
        _ => Ok(lhs.is_identical(rhs)),
    }
}

fn elementwise_equal(
    interp: &mut Interpreter,
    left: &[Value],
    right: &[Value],
) -> Result<bool, Signal> {
    if left.len() != right.len() {
        return Ok(false);
    }
    for (a, b) in left.iter().zip(right.iter()) {
        if !values_equal(interp, a, b)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn compare(lhs: &Value, spec: SpecName, rhs: &Value) -> EvalResult {
    let ordering = if let (Some(a), Some(b)) = (as_number(lhs), as_number(rhs)) {
        a.partial_cmp(&b)
    } else if let (Value::Str(a), Value::Str(b)) = (lhs, rhs) {
        Some(a.as_str().cmp(b.as_str()))
    } else {
        return Err(not_defined_between(spec, lhs, rhs));
    };
    let Some(ordering) = ordering else {
        // NaN comparisons are all false.
        return Ok(Value::Bool(false));
    };
    let result = match spec {
        SpecName::Less => ordering.is_lt(),
        SpecName::Grtr => ordering.is_gt(),
        SpecName::LessEq => ordering.is_le(),
        SpecName::GrtrEq => ordering.is_ge(),
        _ => unreachable!(),
    };
    Ok(Value::Bool(result))
}

fn pipe(interp: &mut Interpreter, lhs: &Value, rhs: &Value) -> EvalResult {
    match (lhs, rhs) {
        // Dict merge, right-hand entries winning.
        (Value::Dict(a), Value::Dict(b)) => {
            let merged = Shared::new(DictValue::new());
            for (k, v) in a.borrow().entries().to_vec() {
                dict_insert(interp, &merged, k, v)?;
            }
            for (k, v) in b.borrow().entries().to_vec() {
                dict_insert(interp, &merged, k, v)?;
            }
            Ok(Value::Dict(merged))
        }
        // Type union.
        (Value::Type(a), Value::Type(b)) => {
            let combined = format!(
                "{}|{}",
                interp.interner.lookup(a.borrow().name),
                interp.interner.lookup(b.borrow().name)
            );
            let name = interp.interner.intern(&combined);
            // Unions flatten: (A | B) | C has three members.
            let mut members = Vec::new();
            for side in [lhs, rhs] {
                let Value::Type(t) = side else { unreachable!() };
                if t.borrow().is_union() {
                    members.extend(t.borrow().union.iter().cloned());
                } else {
                    members.push(side.clone());
                }
            }
            Ok(Value::type_value(TypeValue::union_of(name, members)))
        }
        _ => Err(not_defined_between(SpecName::Pipe, lhs, rhs)),
    }
}

/// `item in container` — the container is the receiver.
fn has_item(interp: &mut Interpreter, container: &Value, item: &Value) -> EvalResult {
    match container {
        Value::List(items) => {
            let snapshot = items.borrow().clone();
            for candidate in &snapshot {
                if values_equal(interp, candidate, item)? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        Value::Tuple(items) => {
            for candidate in items.iter() {
                if values_equal(interp, candidate, item)? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        Value::Dict(dict) => Ok(Value::Bool(dict_contains(interp, dict, item)?)),
        Value::Str(s) => match item {
            Value::Str(needle) => Ok(Value::Bool(s.contains(needle.as_str()))),
            _ => Err(type_error(format!(
                "substring check requires a Str, got {}",
                item.type_name()
            ))
            .into()),
        },
        _ => Err(not_defined_between(SpecName::HasItem, container, item)),
    }
}
