//! `regex` module and the `re"..."` literal.
//!
//! A compiled pattern is an object exposing bound match methods; the
//! literal and `regex.compile` produce the same shape.

use std::rc::Rc;

use crate::context::{expect_arity, NativeContext};
use crate::errors::{value_error, RuntimeError};
use crate::interp::Interpreter;
use crate::modules::module_object;
use crate::signal::EvalResult;
use crate::value::{FuncValue, ObjectValue, Value};

/// Compile a pattern into a regex object.
pub fn regex_object(interp: &mut Interpreter, pattern: &str) -> EvalResult {
    let compiled = Rc::new(
        regex::Regex::new(pattern)
            .map_err(|e| value_error(format!("invalid regex: {e}")))?,
    );

    let mut object = ObjectValue::named(interp.interner.intern("Regex"));
    let mut member = |name: &str, value: Value| {
        object.public.insert(interp.interner.intern(name), value);
    };

    member("pattern", Value::str(pattern));

    let re = compiled.clone();
    member(
        "matches",
        Value::func(FuncValue::native(
            "Regex.matches",
            Rc::new(move |ctx, args| {
                expect_arity("matches", &args, 1)?;
                let text = ctx.str_arg(&args, 0, "matches")?;
                Ok(Value::Bool(re.is_match(&text)))
            }),
        )),
    );

    let re = compiled.clone();
    member(
        "find",
        Value::func(FuncValue::native(
            "Regex.find",
            Rc::new(move |ctx, args| {
                expect_arity("find", &args, 1)?;
                let text = ctx.str_arg(&args, 0, "find")?;
                Ok(match re.find(&text) {
                    Some(found) => Value::str(found.as_str()),
                    None => Value::Null,
                })
            }),
        )),
    );

    let re = compiled.clone();
    member(
        "find_all",
        Value::func(FuncValue::native(
            "Regex.find_all",
            Rc::new(move |ctx, args| {
                expect_arity("find_all", &args, 1)?;
                let text = ctx.str_arg(&args, 0, "find_all")?;
                Ok(Value::list(
                    re.find_iter(&text)
                        .map(|m| Value::str(m.as_str()))
                        .collect(),
                ))
            }),
        )),
    );

    let re = compiled;
    member(
        "replace",
        Value::func(FuncValue::native(
            "Regex.replace",
            Rc::new(move |ctx, args| {
                expect_arity("replace", &args, 2)?;
                let text = ctx.str_arg(&args, 0, "replace")?;
                let replacement = ctx.str_arg(&args, 1, "replace")?;
                Ok(Value::str(
                    re.replace_all(&text, replacement.as_str()).to_string(),
                ))
            }),
        )),
    );

    Ok(Value::object(object))
}

pub(super) fn load(ctx: &mut NativeContext<'_>) -> Result<Value, RuntimeError> {
    let compile = Value::func(FuncValue::native(
        "regex.compile",
        Rc::new(|ctx, args| {
            let pattern = ctx.str_arg(&args, 0, "regex.compile")?;
            regex_object(ctx.interp, &pattern)
        }),
    ));

    Ok(module_object(
        &ctx.interp.interner,
        "regex",
        vec![("compile", compile)],
    ))
}
