//! Conversions: `repr`, `str`, `hash`, and the `format` slot.

use std::fmt::Write as _;

use crate::dispatch::{hash_of, repr_of, str_of};
use crate::errors::{type_error, unhashable};
use crate::interp::Interpreter;
use crate::signal::EvalResult;
use crate::spec::SpecName;
use crate::value::{CallArgs, Value};

pub(super) fn eval(
    interp: &mut Interpreter,
    value: &Value,
    spec: SpecName,
    args: CallArgs,
) -> EvalResult {
    match spec {
        SpecName::Repr => Ok(Value::str(repr_default(interp, value)?)),
        SpecName::Str => Ok(Value::str(str_default(interp, value)?)),
        SpecName::Hash => hash_default(interp, value),
        SpecName::Format => format_value(interp, value, args),
        _ => unreachable!("non-conversion spec routed to format::eval"),
    }
}

/// Number rendering: Rust's shortest-form float display already prints
/// `3.0` as `3` and `2.5` as `2.5`.
pub(super) fn format_num(n: f64) -> String {
    format!("{n}")
}

fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

fn repr_default(
    interp: &mut Interpreter,
    value: &Value,
) -> Result<String, crate::signal::Signal> {
    Ok(match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Num(n) => format_num(*n),
        Value::Str(s) => quote_str(s),
        Value::List(items) => {
            let snapshot = items.borrow().clone();
            let mut out = String::from("[");
            for (i, item) in snapshot.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&repr_of(interp, item)?);
            }
            out.push(']');
            out
        }
        Value::Tuple(items) => {
            let mut out = String::from("(");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&repr_of(interp, item)?);
            }
            if items.len() == 1 {
                out.push(',');
            }
            out.push(')');
            out
        }
        Value::Dict(dict) => {
            let entries = dict.borrow().entries().to_vec();
            let mut out = String::from("{");
            for (i, (k, v)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{}: {}", repr_of(interp, k)?, repr_of(interp, v)?);
            }
            out.push('}');
            out
        }
        Value::Func(f) => match f.name {
            Some(name) => format!("<fn {}>", interp.interner.lookup(name)),
            None => "<fn>".to_string(),
        },
        Value::Property(_) => "<property>".to_string(),
        Value::Type(t) => format!("<type {}>", interp.interner.lookup(t.borrow().name)),
        Value::Object(obj) => match obj.borrow().name {
            Some(name) => format!("<{}>", interp.interner.lookup(name)),
            None => "<Object>".to_string(),
        },
        Value::Iterator(_) => "<iterator>".to_string(),
        Value::Error(e) => format!("{}: {}", e.kind.name(), e.message),
    })
}

fn str_default(
    interp: &mut Interpreter,
    value: &Value,
) -> Result<String, crate::signal::Signal> {
    match value {
        Value::Str(s) => Ok(s.as_str().to_string()),
        Value::Num(n) => Ok(format_num(*n)),
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Error(e) => Ok(e.message.clone()),
        // Everything else falls back to repr (through dispatch, so an
        // instance repr override is honoured).
        other => repr_of(interp, other).map_err(Into::into),
    }
}

fn hash_default(interp: &mut Interpreter, value: &Value) -> EvalResult {
    let bits = match value {
        Value::Null => fnv1a(&[0x00]),
        Value::Bool(b) => numeric_hash(f64::from(*b)),
        Value::Num(n) => numeric_hash(*n),
        Value::Str(s) => fnv1a(s.as_bytes()),
        Value::Tuple(items) => {
            let mut acc = fnv1a(&[0x07]);
            for item in items.iter() {
                acc = acc
                    .rotate_left(5)
                    .wrapping_mul(0x0100_0000_01b3)
                    ^ hash_of(interp, item)?;
            }
            acc
        }
        other => return Err(unhashable(other.type_name()).into()),
    };
    Ok(Value::Num(f64::from_bits(bits)))
}

/// Equal numbers must hash equal, including `Bool` as 0/1 and both
/// zero signs.
fn numeric_hash(n: f64) -> u64 {
    let normalized = if n == 0.0 { 0.0 } else { n };
    fnv1a(&normalized.to_bits().to_le_bytes())
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// The `format` slot: `str` conversion shaped by an optional spec
/// string (from f-string `{value:spec}` interpolations).
///
/// Understood spec shape: `[0][width][.precision]`. Width pads numbers
/// on the left and strings on the right; precision applies to numbers.
fn format_value(interp: &mut Interpreter, value: &Value, args: CallArgs) -> EvalResult {
    let spec = match args.args.first() {
        None => None,
        Some(Value::Str(s)) => Some(s.as_str().to_string()),
        Some(Value::Null) => None,
        Some(other) => {
            return Err(type_error(format!(
                "format spec must be a Str, got {}",
                other.type_name()
            ))
            .into())
        }
    };
    let Some(spec) = spec.filter(|s| !s.is_empty()) else {
        return Ok(Value::str(str_of(interp, value)?));
    };

    let (zero_pad, rest) = match spec.strip_prefix('0') {
        Some(rest) => (true, rest),
        None => (false, spec.as_str()),
    };
    let (width_part, precision) = match rest.split_once('.') {
        Some((w, p)) => (w, p.parse::<usize>().ok()),
        None => (rest, None),
    };
    let width = width_part.parse::<usize>().unwrap_or(0);

    let text = match value {
        Value::Num(n) => match precision {
            Some(p) => format!("{n:.p$}"),
            None => format_num(*n),
        },
        other => str_of(interp, other)?,
    };

    let padded = if text.len() >= width {
        text
    } else if matches!(value, Value::Num(_)) {
        let fill = if zero_pad { '0' } else { ' ' };
        let mut out = String::new();
        for _ in 0..(width - text.len()) {
            out.push(fill);
        }
        out.push_str(&text);
        out
    } else {
        let mut out = text;
        while out.len() < width {
            out.push(' ');
        }
        out
    };
    Ok(Value::str(padded))
}
