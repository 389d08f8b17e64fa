//! Import resolution.
//!
//! Order: session cache, then the host-registered module registry, then
//! the built-in loader table. Loader failures become "module invalid",
//! distinct from "module not found". Remote (URL) imports are
//! deliberately unimplemented and raise immediately.

use quill_ir::Name;

use crate::context::NativeContext;
use crate::errors::{module_invalid, module_not_found, remote_imports_unsupported, RuntimeError};
use crate::interp::Interpreter;
use crate::signal::Signal;
use crate::value::Value;

/// A built-in module loader: builds a fresh module value on first
/// import.
pub type LoaderFn = fn(&mut NativeContext<'_>) -> Result<Value, RuntimeError>;

impl Interpreter {
    /// Resolve an import, caching per session: importing the same name
    /// twice yields the identical module value.
    pub fn resolve_import(&mut self, name: Name) -> Result<Value, Signal> {
        if let Some(cached) = self.import_cache.get(&name) {
            return Ok(cached.clone());
        }
        if let Some(registered) = self.registry.get(&name).cloned() {
            self.import_cache.insert(name, registered.clone());
            return Ok(registered);
        }

        let name_str = self.interner.lookup(name);
        if name_str.starts_with("http") {
            return Err(remote_imports_unsupported(name_str).into());
        }

        let Some(loader) = self.loaders.get(name_str).copied() else {
            return Err(module_not_found(name_str).into());
        };
        tracing::debug!(module = name_str, "loading builtin module");
        let module = loader(&mut NativeContext::new(self))
            .map_err(|err| module_invalid(self.interner.lookup(name), &err.message))?;
        self.import_cache.insert(name, module.clone());
        Ok(module)
    }
}
