//! The capability context handed to native code.
//!
//! Everything outside the pure AST-visitor path — native functions,
//! module loaders — receives a [`NativeContext`]: protocol invocation,
//! host-value bridging, and nested evaluation, without exposing the
//! interpreter's internals.

use quill_ir::Name;

use crate::dispatch::{self, dict_insert};
use crate::errors::{type_error, RuntimeError};
use crate::interp::Interpreter;
use crate::signal::{EvalResult, Signal};
use crate::spec::SpecName;
use crate::value::{CallArgs, DictValue, Shared, Value};

/// Capability object for native operations.
pub struct NativeContext<'a> {
    pub interp: &'a mut Interpreter,
}

impl<'a> NativeContext<'a> {
    pub fn new(interp: &'a mut Interpreter) -> Self {
        NativeContext { interp }
    }

    pub fn invoke_spec(&mut self, value: &Value, spec: SpecName, args: CallArgs) -> EvalResult {
        dispatch::invoke_spec(self.interp, value, spec, args)
    }

    pub fn call(&mut self, callable: &Value, args: CallArgs) -> EvalResult {
        self.interp.call_callable(callable, args)
    }

    pub fn str_of(&mut self, value: &Value) -> Result<String, Signal> {
        dispatch::str_of(self.interp, value)
    }

    pub fn repr_of(&mut self, value: &Value) -> Result<String, Signal> {
        dispatch::repr_of(self.interp, value)
    }

    pub fn truthy(&mut self, value: &Value) -> Result<bool, Signal> {
        dispatch::truthy(self.interp, value)
    }

    pub fn intern(&self, s: &str) -> Name {
        self.interp.interner.intern(s)
    }

    /// Extract a required `Str` argument.
    pub fn str_arg(&self, args: &CallArgs, idx: usize, what: &str) -> Result<String, Signal> {
        match args.args.get(idx) {
            Some(Value::Str(s)) => Ok(s.as_str().to_string()),
            Some(other) => Err(type_error(format!(
                "{what} expects a Str argument, got {}",
                other.type_name()
            ))
            .into()),
            None => Err(type_error(format!("{what} is missing a Str argument")).into()),
        }
    }

    /// Extract a required `Num` argument.
    pub fn num_arg(&self, args: &CallArgs, idx: usize, what: &str) -> Result<f64, Signal> {
        match args.args.get(idx) {
            Some(Value::Num(n)) => Ok(*n),
            Some(other) => Err(type_error(format!(
                "{what} expects a Num argument, got {}",
                other.type_name()
            ))
            .into()),
            None => Err(type_error(format!("{what} is missing a Num argument")).into()),
        }
    }

    /// Convert a host JSON value into a runtime value.
    pub fn json_to_value(&mut self, json: &serde_json::Value) -> EvalResult {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::num(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::str(s.clone()),
            serde_json::Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.json_to_value(item)?);
                }
                Value::list(out)
            }
            serde_json::Value::Object(map) => {
                let dict = Shared::new(DictValue::new());
                for (key, item) in map {
                    let value = self.json_to_value(item)?;
                    dict_insert(self.interp, &dict, Value::str(key.clone()), value)?;
                }
                Value::Dict(dict)
            }
        })
    }

    /// Convert a runtime value into host JSON.
    ///
    /// Total for null/bool/num/str/list/tuple/dict. Other kinds (and
    /// non-string dict keys) are errors unless `repr_fallback` is set,
    /// in which case their repr string stands in.
    pub fn value_to_json(
        &mut self,
        value: &Value,
        repr_fallback: bool,
    ) -> Result<serde_json::Value, Signal> {
        Ok(match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Num(n) => match serde_json::Number::from_f64(*n) {
                Some(number) => serde_json::Value::Number(number),
                None => {
                    return Err(
                        type_error("non-finite numbers cannot be converted to JSON").into()
                    )
                }
            },
            Value::Str(s) => serde_json::Value::String(s.as_str().to_string()),
            Value::List(items) => {
                let snapshot = items.borrow().clone();
                let mut out = Vec::with_capacity(snapshot.len());
                for item in &snapshot {
                    out.push(self.value_to_json(item, repr_fallback)?);
                }
                serde_json::Value::Array(out)
            }
            Value::Tuple(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items.iter() {
                    out.push(self.value_to_json(item, repr_fallback)?);
                }
                serde_json::Value::Array(out)
            }
            Value::Dict(dict) => {
                let entries = dict.borrow().entries().to_vec();
                let mut map = serde_json::Map::with_capacity(entries.len());
                for (key, item) in entries {
                    let key_str = match &key {
                        Value::Str(s) => s.as_str().to_string(),
                        other if repr_fallback => self.repr_of(other)?,
                        other => {
                            return Err(type_error(format!(
                                "JSON keys must be Str, got {}",
                                other.type_name()
                            ))
                            .into())
                        }
                    };
                    map.insert(key_str, self.value_to_json(&item, repr_fallback)?);
                }
                serde_json::Value::Object(map)
            }
            other if repr_fallback => serde_json::Value::String(self.repr_of(other)?),
            other => {
                return Err(type_error(format!(
                    "{} cannot be converted to JSON",
                    other.type_name()
                ))
                .into())
            }
        })
    }

    /// Run a source snippet in a fresh interpreter instance and return
    /// its result value.
    ///
    /// The interner is shared so names produced by the snippet resolve
    /// in this interpreter too; everything else (environment, imports)
    /// is isolated.
    pub fn eval_source(&mut self, filename: &str, source: &str) -> Result<Value, RuntimeError> {
        let mut nested = self.fresh_interpreter(filename, source);
        let program = quill_parse::parse_source(source, &nested.interner)
            .map_err(|e| RuntimeError::new(crate::errors::ErrorKind::SyntaxError, e.message))?;
        nested.run(&program)
    }

    /// Run a snippet and return its *global scope object* — the module
    /// bootstrap path: loaders evaluate in-language definitions and lift
    /// the resulting scope into a module.
    pub fn eval_module_source(
        &mut self,
        filename: &str,
        source: &str,
    ) -> Result<Value, RuntimeError> {
        let mut nested = self.fresh_interpreter(filename, source);
        let program = quill_parse::parse_source(source, &nested.interner)
            .map_err(|e| RuntimeError::new(crate::errors::ErrorKind::SyntaxError, e.message))?;
        nested.run(&program)?;
        Ok(nested.env.global())
    }

    fn fresh_interpreter(&self, filename: &str, source: &str) -> Interpreter {
        let mut nested =
            Interpreter::with_interner(self.interp.interner.clone(), filename, source);
        nested.set_printer(self.interp.printer());
        nested
    }
}

/// Check an exact native-argument count.
pub fn expect_arity(what: &str, args: &CallArgs, expected: usize) -> Result<(), Signal> {
    if args.args.len() != expected || !args.kwargs.is_empty() {
        return Err(type_error(format!(
            "{what} takes {expected} argument{}, got {}",
            if expected == 1 { "" } else { "s" },
            args.args.len()
        ))
        .into());
    }
    Ok(())
}
