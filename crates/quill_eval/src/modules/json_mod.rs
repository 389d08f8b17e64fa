//! `json` module: parse and serialize via the host JSON codec.

use std::rc::Rc;

use crate::context::NativeContext;
use crate::errors::{value_error, RuntimeError};
use crate::modules::module_object;
use crate::value::{FuncValue, Value};

pub(super) fn load(ctx: &mut NativeContext<'_>) -> Result<Value, RuntimeError> {
    let parse = Value::func(FuncValue::native(
        "json.parse",
        Rc::new(|ctx, args| {
            let text = ctx.str_arg(&args, 0, "json.parse")?;
            let parsed: serde_json::Value = serde_json::from_str(&text)
                .map_err(|e| value_error(format!("invalid JSON: {e}")))?;
            ctx.json_to_value(&parsed)
        }),
    ));

    let dumps = Value::func(FuncValue::native(
        "json.dumps",
        Rc::new(|ctx, args| {
            let value = args
                .args
                .first()
                .cloned()
                .unwrap_or(Value::Null);
            // Optional second argument: fall back to reprs for values
            // JSON cannot express.
            let repr_fallback = match args.args.get(1) {
                Some(flag) => ctx.truthy(flag)?,
                None => false,
            };
            let json = ctx.value_to_json(&value, repr_fallback)?;
            Ok(Value::str(json.to_string()))
        }),
    ));

    Ok(module_object(
        &ctx.interp.interner,
        "json",
        vec![("parse", parse), ("dumps", dumps)],
    ))
}
