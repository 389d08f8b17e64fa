//! `strings` module.
//!
//! Partly native, partly bootstrapped in-language: the loader evaluates
//! a Quill snippet in a nested interpreter and lifts the resulting
//! functions into the module. This exercises the nested-eval capability
//! the same way a user-supplied library would.

use std::rc::Rc;

use crate::context::{expect_arity, NativeContext};
use crate::errors::{module_invalid, value_error, RuntimeError};
use crate::modules::module_object;
use crate::value::{FuncValue, Value};

/// In-language helpers, evaluated at load time.
const BOOTSTRAP: &str = r#"
pub fn capitalize(s) {
    pub first = true;
    pub out = "";
    for c in s {
        if first {
            out = out + c.upper();
            first = false;
        } else {
            out = out + c;
        }
    }
    return out;
}

pub fn title(s) {
    pub words = s.split(" ");
    return " ".join(words.map(capitalize));
}
"#;

pub(super) fn load(ctx: &mut NativeContext<'_>) -> Result<Value, RuntimeError> {
    let reverse = Value::func(FuncValue::native(
        "strings.reverse",
        Rc::new(|ctx, args| {
            expect_arity("strings.reverse", &args, 1)?;
            let s = ctx.str_arg(&args, 0, "strings.reverse")?;
            Ok(Value::str(s.chars().rev().collect::<String>()))
        }),
    ));

    let repeat = Value::func(FuncValue::native(
        "strings.repeat",
        Rc::new(|ctx, args| {
            expect_arity("strings.repeat", &args, 2)?;
            let s = ctx.str_arg(&args, 0, "strings.repeat")?;
            let n = ctx.num_arg(&args, 1, "strings.repeat")?;
            if n < 0.0 || n.fract() != 0.0 {
                return Err(
                    value_error("repeat count must be a non-negative integer").into()
                );
            }
            Ok(Value::str(s.repeat(n as usize)))
        }),
    ));

    let module = module_object(
        &ctx.interp.interner,
        "strings",
        vec![("reverse", reverse), ("repeat", repeat)],
    );

    // Lift the bootstrapped functions out of the nested scope.
    let scope = ctx.eval_module_source("<strings>", BOOTSTRAP)?;
    let Value::Object(scope_obj) = &scope else {
        return Err(module_invalid("strings", "bootstrap produced no scope"));
    };
    if let Value::Object(module_obj) = &module {
        for name in ["capitalize", "title"] {
            let interned = ctx.intern(name);
            match scope_obj.borrow().public.get(&interned) {
                Some(func) => {
                    module_obj.borrow_mut().public.insert(interned, func.clone());
                }
                None => {
                    return Err(module_invalid(
                        "strings",
                        &format!("bootstrap did not define '{name}'"),
                    ))
                }
            }
        }
    }
    Ok(module)
}
