//! Quill Eval - the tree-walking interpreter.
//!
//! # Architecture
//!
//! - `value`: the runtime value model — every object carries public
//!   attributes, private attributes, and a protocol ("spec") table
//! - `spec` / `dispatch`: the protocol slots and the single dispatch
//!   entry point every operation routes through
//! - `env`: scopes as objects, chained through their `parent` slot
//! - `signal`: control flow (`return`/`break n`/`continue n`) as an
//!   explicit sum type in the result channel, disjoint from errors
//! - `errors`: the typed, user-catchable error taxonomy
//! - `interp`: the AST walker, calling convention, imports, version
//!   gate
//! - `context`: the capability object handed to native code
//! - `modules`: built-in library loaders (json, toml, regex, math,
//!   strings)

mod builtins;
pub mod context;
mod dispatch;
mod env;
pub mod errors;
mod interp;
mod modules;
mod print;
mod signal;
mod spec;
mod value;

pub use context::{expect_arity, NativeContext};
pub use dispatch::{
    dict_get, dict_insert, invoke_spec, make_iterator, repr_of, str_of, truthy, values_equal,
};
pub use env::Environment;
pub use errors::{ErrorKind, RuntimeError, TraceFrame};
pub use interp::{Interpreter, LoaderFn};
pub use print::{BufferPrint, PrintHandler, StdoutPrint};
pub use signal::{EvalResult, Signal};
pub use spec::{SpecName, SpecTable};
pub use value::{
    check_value, CallArgs, DictValue, ErrorValue, FuncBody, FuncValue, Heap, IterState, NativeFn,
    ObjectValue, ParamDefault, ParamSpec, Shared, TypeValue, Value, ValueTag,
};

#[cfg(test)]
mod tests;
