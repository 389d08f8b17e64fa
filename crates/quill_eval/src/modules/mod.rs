//! Built-in library modules.
//!
//! Each module is a loader `fn(&mut NativeContext) -> Result<Value>`
//! producing a module object on first import; the interpreter caches
//! the result per session. Modules are thin adapters: they only speak
//! through the capability context.

mod json_mod;
mod math_mod;
mod regex_mod;
mod strings_mod;
mod toml_mod;

pub use regex_mod::regex_object;

use rustc_hash::FxHashMap;

use quill_ir::SharedInterner;

use crate::interp::LoaderFn;
use crate::value::{ObjectValue, Value};

/// The name -> loader table consulted by `import`.
pub(crate) fn loader_table() -> FxHashMap<&'static str, LoaderFn> {
    let mut table: FxHashMap<&'static str, LoaderFn> = FxHashMap::default();
    table.insert("json", json_mod::load);
    table.insert("toml", toml_mod::load);
    table.insert("regex", regex_mod::load);
    table.insert("math", math_mod::load);
    table.insert("strings", strings_mod::load);
    table
}

/// Assemble a module object from named members.
pub(crate) fn module_object(
    interner: &SharedInterner,
    name: &str,
    members: Vec<(&'static str, Value)>,
) -> Value {
    let mut object = ObjectValue::named(interner.intern(name));
    for (member, value) in members {
        object.public.insert(interner.intern(member), value);
    }
    Value::object(object)
}
