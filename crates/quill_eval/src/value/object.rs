//! Objects: named attribute bags that double as scopes.

use rustc_hash::FxHashMap;

use quill_ir::Name;

use crate::spec::{SpecName, SpecTable};
use crate::value::Value;

/// An object's three independent namespaces.
///
/// - `public`: ordinary attributes, visible to `.name` access and to
///   name lookup when the object serves as a scope.
/// - `private`: reachable only through `.#name` within the defining
///   scope chain.
/// - `specs`: the protocol table. The parent link that chains scopes
///   together is itself a spec slot (`SpecName::Parent`), so re-wiring
///   an object's parent at runtime re-wires name resolution through it.
#[derive(Debug, Default)]
pub struct ObjectValue {
    pub name: Option<Name>,
    pub public: FxHashMap<Name, Value>,
    pub private: FxHashMap<Name, Value>,
    pub specs: SpecTable,
}

impl ObjectValue {
    pub fn new() -> Self {
        ObjectValue::default()
    }

    pub fn named(name: Name) -> Self {
        ObjectValue {
            name: Some(name),
            ..ObjectValue::default()
        }
    }

    /// Fresh object whose parent slot points at `parent`.
    pub fn with_parent(parent: Value) -> Self {
        let mut object = ObjectValue::default();
        object.specs.insert(SpecName::Parent, parent);
        object
    }

    pub fn parent(&self) -> Option<Value> {
        self.specs.get(&SpecName::Parent).cloned()
    }

    pub fn set_parent(&mut self, parent: Value) {
        self.specs.insert(SpecName::Parent, parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_is_a_spec_slot() {
        let parent = Value::object(ObjectValue::new());
        let child = ObjectValue::with_parent(parent.clone());
        assert!(child.parent().unwrap().is_identical(&parent));
        assert!(child.specs.contains_key(&SpecName::Parent));
    }

    #[test]
    fn set_parent_rewires() {
        let first = Value::object(ObjectValue::new());
        let second = Value::object(ObjectValue::new());
        let mut object = ObjectValue::with_parent(first);
        object.set_parent(second.clone());
        assert!(object.parent().unwrap().is_identical(&second));
    }
}
