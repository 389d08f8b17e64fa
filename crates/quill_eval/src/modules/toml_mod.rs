//! `toml` module: parse and serialize via the host TOML codec.

use std::rc::Rc;

use crate::context::NativeContext;
use crate::dispatch::dict_insert;
use crate::errors::{type_error, value_error, RuntimeError};
use crate::modules::module_object;
use crate::signal::Signal;
use crate::value::{DictValue, FuncValue, Shared, Value};

fn toml_to_value(ctx: &mut NativeContext<'_>, toml: &toml::Value) -> Result<Value, Signal> {
    Ok(match toml {
        toml::Value::String(s) => Value::str(s.clone()),
        toml::Value::Integer(n) => Value::num(*n as f64),
        toml::Value::Float(n) => Value::num(*n),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => Value::str(dt.to_string()),
        toml::Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(toml_to_value(ctx, item)?);
            }
            Value::list(out)
        }
        toml::Value::Table(table) => {
            let dict = Shared::new(DictValue::new());
            for (key, item) in table {
                let value = toml_to_value(ctx, item)?;
                dict_insert(ctx.interp, &dict, Value::str(key.clone()), value)?;
            }
            Value::Dict(dict)
        }
    })
}

fn value_to_toml(ctx: &mut NativeContext<'_>, value: &Value) -> Result<toml::Value, Signal> {
    Ok(match value {
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Num(n) => {
            if n.fract() == 0.0 && n.is_finite() && n.abs() < i64::MAX as f64 {
                toml::Value::Integer(*n as i64)
            } else {
                toml::Value::Float(*n)
            }
        }
        Value::Str(s) => toml::Value::String(s.as_str().to_string()),
        Value::List(items) => {
            let snapshot = items.borrow().clone();
            let mut out = Vec::with_capacity(snapshot.len());
            for item in &snapshot {
                out.push(value_to_toml(ctx, item)?);
            }
            toml::Value::Array(out)
        }
        Value::Tuple(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter() {
                out.push(value_to_toml(ctx, item)?);
            }
            toml::Value::Array(out)
        }
        Value::Dict(dict) => {
            let entries = dict.borrow().entries().to_vec();
            let mut table = toml::map::Map::with_capacity(entries.len());
            for (key, item) in entries {
                let Value::Str(key) = &key else {
                    return Err(type_error(format!(
                        "TOML keys must be Str, got {}",
                        key.type_name()
                    ))
                    .into());
                };
                table.insert(key.as_str().to_string(), value_to_toml(ctx, &item)?);
            }
            toml::Value::Table(table)
        }
        other => {
            return Err(type_error(format!(
                "{} cannot be converted to TOML",
                other.type_name()
            ))
            .into())
        }
    })
}

pub(super) fn load(ctx: &mut NativeContext<'_>) -> Result<Value, RuntimeError> {
    let parse = Value::func(FuncValue::native(
        "toml.parse",
        Rc::new(|ctx, args| {
            let text = ctx.str_arg(&args, 0, "toml.parse")?;
            let parsed: toml::Value = toml::from_str(&text)
                .map_err(|e| value_error(format!("invalid TOML: {e}")))?;
            toml_to_value(ctx, &parsed)
        }),
    ));

    let dumps = Value::func(FuncValue::native(
        "toml.dumps",
        Rc::new(|ctx, args| {
            let value = args.args.first().cloned().unwrap_or(Value::Null);
            let toml_value = value_to_toml(ctx, &value)?;
            toml::to_string(&toml_value)
                .map(Value::str)
                .map_err(|e| Signal::from(value_error(format!("cannot serialize TOML: {e}"))))
        }),
    ));

    Ok(module_object(
        &ctx.interp.interner,
        "toml",
        vec![("parse", parse), ("dumps", dumps)],
    ))
}
