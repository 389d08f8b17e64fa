//! `math` module: constants and elementary functions.

use std::rc::Rc;

use crate::context::{expect_arity, NativeContext};
use crate::errors::{value_error, RuntimeError};
use crate::modules::module_object;
use crate::value::{FuncValue, Value};

fn unary(name: &'static str, f: fn(f64) -> f64) -> Value {
    Value::func(FuncValue::native(
        name,
        Rc::new(move |ctx, args| {
            expect_arity(name, &args, 1)?;
            Ok(Value::num(f(ctx.num_arg(&args, 0, name)?)))
        }),
    ))
}

pub(super) fn load(ctx: &mut NativeContext<'_>) -> Result<Value, RuntimeError> {
    let sqrt = Value::func(FuncValue::native(
        "math.sqrt",
        Rc::new(|ctx, args| {
            expect_arity("math.sqrt", &args, 1)?;
            let n = ctx.num_arg(&args, 0, "math.sqrt")?;
            if n < 0.0 {
                return Err(value_error("sqrt of a negative number").into());
            }
            Ok(Value::num(n.sqrt()))
        }),
    ));

    let pow = Value::func(FuncValue::native(
        "math.pow",
        Rc::new(|ctx, args| {
            expect_arity("math.pow", &args, 2)?;
            let base = ctx.num_arg(&args, 0, "math.pow")?;
            let exponent = ctx.num_arg(&args, 1, "math.pow")?;
            Ok(Value::num(base.powf(exponent)))
        }),
    ));

    let min = Value::func(FuncValue::native(
        "math.min",
        Rc::new(|ctx, args| {
            expect_arity("math.min", &args, 2)?;
            let a = ctx.num_arg(&args, 0, "math.min")?;
            let b = ctx.num_arg(&args, 1, "math.min")?;
            Ok(Value::num(a.min(b)))
        }),
    ));

    let max = Value::func(FuncValue::native(
        "math.max",
        Rc::new(|ctx, args| {
            expect_arity("math.max", &args, 2)?;
            let a = ctx.num_arg(&args, 0, "math.max")?;
            let b = ctx.num_arg(&args, 1, "math.max")?;
            Ok(Value::num(a.max(b)))
        }),
    ));

    Ok(module_object(
        &ctx.interp.interner,
        "math",
        vec![
            ("pi", Value::num(std::f64::consts::PI)),
            ("e", Value::num(std::f64::consts::E)),
            ("sqrt", sqrt),
            ("pow", pow),
            ("min", min),
            ("max", max),
            ("floor", unary("math.floor", f64::floor)),
            ("ceil", unary("math.ceil", f64::ceil)),
            ("abs", unary("math.abs", f64::abs)),
        ],
    ))
}
