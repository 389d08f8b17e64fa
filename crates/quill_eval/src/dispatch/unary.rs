//! Default unary operator implementations.

use crate::errors::spec_not_defined;
use crate::interp::Interpreter;
use crate::signal::EvalResult;
use crate::spec::SpecName;
use crate::value::Value;

pub(super) fn eval(_interp: &mut Interpreter, value: &Value, spec: SpecName) -> EvalResult {
    match spec {
        SpecName::UAdd => match value {
            Value::Num(n) => Ok(Value::num(*n)),
            Value::Bool(b) => Ok(Value::num(f64::from(*b))),
            _ => Err(spec_not_defined("uadd", value.type_name()).into()),
        },
        SpecName::Neg => match value {
            Value::Num(n) => Ok(Value::num(-n)),
            Value::Bool(b) => Ok(Value::num(-f64::from(*b))),
            _ => Err(spec_not_defined("neg", value.type_name()).into()),
        },
        SpecName::Bool => Ok(Value::Bool(bool_default(value))),
        _ => unreachable!("non-unary spec routed to unary::eval"),
    }
}

/// Default truthiness: everything is true unless its kind says
/// otherwise.
pub(super) fn bool_default(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Num(n) => *n != 0.0,
        Value::Str(s) => !s.is_empty(),
        Value::List(items) => !items.borrow().is_empty(),
        Value::Tuple(items) => !items.is_empty(),
        Value::Dict(dict) => !dict.borrow().is_empty(),
        _ => true,
    }
}
