//! The environment: a stack of scope *objects*.
//!
//! Scopes are not a separate structure — they are ordinary `Object`
//! values whose `public` map is the variable namespace and whose
//! `parent` spec slot links to the enclosing scope. Entering a block
//! pushes a fresh object parented to the current one; `edit obj { }`
//! pushes `obj` itself, making its attributes directly assignable;
//! function calls swap in a fresh stack rooted at the callee's captured
//! scope (see the interpreter), which is what keeps lookup lexical
//! rather than dynamic.
//!
//! Because parents are re-wirable at runtime, a pathological program can
//! tie the chain into a cycle; walks carry a hop limit and report a
//! `ScopeError` instead of spinning.

use quill_ir::{Name, Vis};

use crate::errors::{scope_error, RuntimeError};
use crate::spec::SpecName;
use crate::value::{ObjectValue, Value};

/// Parent hops before a walk is declared cyclic.
const MAX_SCOPE_HOPS: usize = 10_000;

pub struct Environment {
    /// Scope objects, innermost last. Never empty.
    stack: Vec<Value>,
}

impl Environment {
    /// Environment rooted at an existing scope object.
    pub fn rooted(scope: Value) -> Self {
        debug_assert!(matches!(scope, Value::Object(_)));
        Environment { stack: vec![scope] }
    }

    /// Fresh environment with a brand-new global scope.
    pub fn new() -> Self {
        Environment::rooted(Value::object(ObjectValue::new()))
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The innermost scope object.
    pub fn current(&self) -> Value {
        self.stack
            .last()
            .cloned()
            .unwrap_or_else(|| Value::object(ObjectValue::new()))
    }

    /// The outermost (module/global) scope object.
    pub fn global(&self) -> Value {
        self.stack
            .first()
            .cloned()
            .unwrap_or_else(|| Value::object(ObjectValue::new()))
    }

    /// Push a fresh scope parented to the current one.
    pub fn push_child(&mut self) {
        let child = Value::object(ObjectValue::with_parent(self.current()));
        self.stack.push(child);
    }

    /// Push an existing object as the scope (`edit`, type bodies).
    pub fn push_value(&mut self, scope: Value) {
        self.stack.push(scope);
    }

    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Look a name up: stack entries innermost-outward, each walked
    /// through its parent chain.
    pub fn lookup(&self, name: Name) -> Result<Option<Value>, RuntimeError> {
        for scope in self.stack.iter().rev() {
            if let Some(found) = chain_lookup(scope, name)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Assign to an existing binding, mutating the first frame (by the
    /// lookup walk) that defines it. Returns `false` if no frame does.
    pub fn assign(&self, name: Name, value: Value) -> Result<bool, RuntimeError> {
        for scope in self.stack.iter().rev() {
            let mut cursor = scope.clone();
            for _ in 0..MAX_SCOPE_HOPS {
                let Value::Object(obj) = &cursor else { break };
                {
                    let mut borrow = obj.borrow_mut();
                    if borrow.public.contains_key(&name) {
                        borrow.public.insert(name, value);
                        return Ok(true);
                    }
                }
                let parent = {
                    let borrow = obj.borrow();
                    borrow.parent()
                };
                match parent {
                    Some(p) => cursor = p,
                    None => break,
                }
            }
        }
        Ok(false)
    }

    /// Declare a binding in the innermost scope object, into the
    /// namespace selected by the declaration's visibility. `Spec`
    /// declarations are handled by the caller (the slot name must be
    /// validated first).
    pub fn declare(&self, vis: Vis, name: Name, value: Value) {
        let current = self.current();
        let Value::Object(obj) = &current else {
            return;
        };
        let mut borrow = obj.borrow_mut();
        match vis {
            Vis::Pub => {
                borrow.public.insert(name, value);
            }
            Vis::Priv => {
                borrow.private.insert(name, value);
            }
            Vis::Spec => {
                // Callers route spec declarations through declare_spec.
                debug_assert!(false, "spec declarations use declare_spec");
            }
        }
    }

    /// Install a protocol slot on the innermost scope object.
    pub fn declare_spec(&self, slot: SpecName, value: Value) {
        let current = self.current();
        if let Value::Object(obj) = &current {
            obj.borrow_mut().specs.insert(slot, value);
        }
    }

    /// Remove a public binding from the first frame that defines it.
    pub fn remove(&self, name: Name) -> Result<bool, RuntimeError> {
        for scope in self.stack.iter().rev() {
            let mut cursor = scope.clone();
            for _ in 0..MAX_SCOPE_HOPS {
                let Value::Object(obj) = &cursor else { break };
                {
                    let mut borrow = obj.borrow_mut();
                    if borrow.public.remove(&name).is_some() {
                        return Ok(true);
                    }
                }
                let parent = {
                    let borrow = obj.borrow();
                    borrow.parent()
                };
                match parent {
                    Some(p) => cursor = p,
                    None => break,
                }
            }
        }
        Ok(false)
    }

    /// Whether `candidate` is one of the scope objects reachable from
    /// this environment — the privacy boundary for `.#` access.
    pub fn contains_scope(&self, candidate: &Value) -> bool {
        for scope in self.stack.iter().rev() {
            let mut cursor = scope.clone();
            for _ in 0..MAX_SCOPE_HOPS {
                if cursor.is_identical(candidate) {
                    return true;
                }
                let Value::Object(obj) = &cursor else { break };
                let parent = obj.borrow().parent();
                match parent {
                    Some(p) => cursor = p,
                    None => break,
                }
            }
        }
        false
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk one scope's parent chain looking for a public attribute.
fn chain_lookup(scope: &Value, name: Name) -> Result<Option<Value>, RuntimeError> {
    let mut cursor = scope.clone();
    for _ in 0..MAX_SCOPE_HOPS {
        let Value::Object(obj) = &cursor else {
            return Ok(None);
        };
        {
            let borrow = obj.borrow();
            if let Some(found) = borrow.public.get(&name) {
                return Ok(Some(found.clone()));
            }
        }
        let parent = {
            let borrow = obj.borrow();
            borrow.parent()
        };
        match parent {
            Some(p) => cursor = p,
            None => return Ok(None),
        }
    }
    Err(scope_error("scope parent chain is cyclic"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_ir::StringInterner;

    fn name(interner: &StringInterner, s: &str) -> Name {
        interner.intern(s)
    }

    #[test]
    fn declare_then_lookup() {
        let interner = StringInterner::new();
        let x = name(&interner, "x");
        let env = Environment::new();
        env.declare(Vis::Pub, x, Value::num(1.0));
        let found = env.lookup(x).unwrap().unwrap();
        assert!(found.is_identical(&Value::num(1.0)));
    }

    #[test]
    fn child_scope_shadows_and_pops() {
        let interner = StringInterner::new();
        let x = name(&interner, "x");
        let mut env = Environment::new();
        env.declare(Vis::Pub, x, Value::num(1.0));
        env.push_child();
        env.declare(Vis::Pub, x, Value::num(2.0));
        assert!(env.lookup(x).unwrap().unwrap().is_identical(&Value::num(2.0)));
        env.pop();
        assert!(env.lookup(x).unwrap().unwrap().is_identical(&Value::num(1.0)));
    }

    #[test]
    fn assign_mutates_defining_frame() {
        let interner = StringInterner::new();
        let x = name(&interner, "x");
        let mut env = Environment::new();
        env.declare(Vis::Pub, x, Value::num(1.0));
        env.push_child();
        assert!(env.assign(x, Value::num(5.0)).unwrap());
        env.pop();
        assert!(env.lookup(x).unwrap().unwrap().is_identical(&Value::num(5.0)));
    }

    #[test]
    fn assign_to_unknown_name_fails() {
        let interner = StringInterner::new();
        let x = name(&interner, "missing");
        let env = Environment::new();
        assert!(!env.assign(x, Value::Null).unwrap());
    }

    #[test]
    fn priv_declarations_use_the_private_namespace() {
        let interner = StringInterner::new();
        let x = name(&interner, "hidden");
        let env = Environment::new();
        env.declare(Vis::Priv, x, Value::num(1.0));
        // Not visible to ordinary lookup.
        assert!(env.lookup(x).unwrap().is_none());
        let Value::Object(obj) = env.current() else {
            panic!("scope must be an object");
        };
        assert!(obj.borrow().private.contains_key(&x));
    }

    #[test]
    fn reparenting_rewires_lookup() {
        let interner = StringInterner::new();
        let x = name(&interner, "x");

        let donor = Value::object(ObjectValue::new());
        if let Value::Object(obj) = &donor {
            obj.borrow_mut().public.insert(x, Value::num(42.0));
        }

        let env = Environment::new();
        assert!(env.lookup(x).unwrap().is_none());
        if let Value::Object(obj) = &env.current() {
            obj.borrow_mut().set_parent(donor);
        }
        assert!(env.lookup(x).unwrap().unwrap().is_identical(&Value::num(42.0)));
    }

    #[test]
    fn cyclic_parent_chain_is_a_scope_error() {
        let interner = StringInterner::new();
        let x = name(&interner, "x");
        let env = Environment::new();
        let current = env.current();
        if let Value::Object(obj) = &current {
            obj.borrow_mut().set_parent(current.clone());
        }
        assert!(env.lookup(x).is_err());
    }

    #[test]
    fn contains_scope_sees_whole_chain() {
        let mut env = Environment::new();
        let global = env.current();
        env.push_child();
        assert!(env.contains_scope(&global));
        assert!(env.contains_scope(&env.current()));
        let stranger = Value::object(ObjectValue::new());
        assert!(!env.contains_scope(&stranger));
    }
}
