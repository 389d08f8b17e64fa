//! Iteration: the `iter` / `next` slot pair.
//!
//! `iter` produces an iterator value; `next` advances it, raising the
//! `StopIteration` signal on exhaustion. Loops convert that signal into
//! termination; it is not an error and `try`/`catch` never sees it.

use crate::dispatch::{find_spec, invoke_spec};
use crate::errors::spec_not_defined;
use crate::interp::Interpreter;
use crate::signal::{EvalResult, Signal};
use crate::spec::SpecName;
use crate::value::{CallArgs, IterState, Value};

pub(super) fn eval(interp: &mut Interpreter, value: &Value, spec: SpecName) -> EvalResult {
    match spec {
        SpecName::Iter => iter_default(value),
        SpecName::Next => next_default(interp, value),
        _ => unreachable!("non-iteration spec routed to iter_ops::eval"),
    }
}

fn iter_default(value: &Value) -> EvalResult {
    match value {
        // An iterator iterates as itself.
        Value::Iterator(_) => Ok(value.clone()),
        Value::List(items) => Ok(Value::iterator(IterState::List {
            items: items.clone(),
            pos: 0,
        })),
        Value::Tuple(items) => Ok(Value::iterator(IterState::Tuple {
            items: items.clone(),
            pos: 0,
        })),
        Value::Str(s) => Ok(Value::iterator(IterState::Snapshot {
            items: s.chars().map(|c| Value::str(c.to_string())).collect(),
            pos: 0,
        })),
        Value::Dict(dict) => Ok(Value::iterator(IterState::Snapshot {
            items: dict.borrow().keys(),
            pos: 0,
        })),
        // An object carrying its own `next` spec supports repeated
        // `next` directly.
        Value::Object(_) => {
            if find_spec(value, SpecName::Next)?.is_some() {
                Ok(Value::iterator(IterState::Custom {
                    target: value.clone(),
                }))
            } else {
                Err(spec_not_defined("iter", value.type_name()).into())
            }
        }
        _ => Err(spec_not_defined("iter", value.type_name()).into()),
    }
}

fn next_default(interp: &mut Interpreter, value: &Value) -> EvalResult {
    let Value::Iterator(state) = value else {
        return Err(spec_not_defined("next", value.type_name()).into());
    };

    // Custom targets re-enter the dispatcher; take what we need out of
    // the borrow first.
    let custom_target = match &*state.borrow() {
        IterState::Custom { target } => Some(target.clone()),
        _ => None,
    };
    if let Some(target) = custom_target {
        return invoke_spec(interp, &target, SpecName::Next, CallArgs::default());
    }

    let mut borrow = state.borrow_mut();
    match &mut *borrow {
        IterState::List { items, pos } => {
            let item = items.borrow().get(*pos).cloned();
            match item {
                Some(item) => {
                    *pos += 1;
                    Ok(item)
                }
                None => Err(Signal::StopIteration),
            }
        }
        IterState::Tuple { items, pos } => match items.get(*pos).cloned() {
            Some(item) => {
                *pos += 1;
                Ok(item)
            }
            None => Err(Signal::StopIteration),
        },
        IterState::Snapshot { items, pos } => match items.get(*pos).cloned() {
            Some(item) => {
                *pos += 1;
                Ok(item)
            }
            None => Err(Signal::StopIteration),
        },
        IterState::Range { next, end, step } => {
            let exhausted = if *step >= 0.0 {
                *next >= *end
            } else {
                *next <= *end
            };
            if exhausted {
                return Err(Signal::StopIteration);
            }
            let item = Value::num(*next);
            *next += *step;
            Ok(item)
        }
        IterState::Custom { .. } => unreachable!("custom handled above"),
    }
}

/// Ask a value for its iterator via the `iter` slot.
pub fn make_iterator(interp: &mut Interpreter, value: &Value) -> EvalResult {
    invoke_spec(interp, value, SpecName::Iter, CallArgs::default())
}
