//! Nominal types: constructors, membership checks, unions.

use quill_ir::Name;

use crate::errors::ErrorKind;
use crate::spec::SpecName;
use crate::value::{Value, ValueTag};

/// A nominal type value.
///
/// Three flavours share this record:
/// - built-in kind types (`Num`, `Str`, ...): `builtin` is set
/// - error types (`TypeError`, ...): `error_kind` is set
/// - user types from `pub type` declarations: `proto` holds the
///   prototype object whose attributes and specs instances inherit
///   through their parent chain, and `init` the constructor if declared
///
/// `T | U` builds a union type: no constructor, `check` delegates to the
/// members.
#[derive(Clone, Debug)]
pub struct TypeValue {
    pub name: Name,
    pub proto: Option<Value>,
    pub init: Option<Value>,
    pub union: Vec<Value>,
    pub builtin: Option<ValueTag>,
    pub error_kind: Option<ErrorKind>,
    /// Generic parameter count accepted by `T[...]`; parameters are
    /// erased at runtime, only the arity is enforced.
    pub arity: Option<usize>,
}

impl TypeValue {
    pub fn user(name: Name, proto: Value, init: Option<Value>) -> Self {
        TypeValue {
            name,
            proto: Some(proto),
            init,
            union: Vec::new(),
            builtin: None,
            error_kind: None,
            arity: None,
        }
    }

    pub fn builtin(name: Name, tag: ValueTag) -> Self {
        TypeValue {
            name,
            proto: None,
            init: None,
            union: Vec::new(),
            builtin: Some(tag),
            error_kind: None,
            arity: None,
        }
    }

    pub fn error(name: Name, kind: ErrorKind) -> Self {
        TypeValue {
            name,
            proto: None,
            init: None,
            union: Vec::new(),
            builtin: None,
            error_kind: Some(kind),
            arity: None,
        }
    }

    pub fn union_of(name: Name, members: Vec<Value>) -> Self {
        TypeValue {
            name,
            proto: None,
            init: None,
            union: members,
            builtin: None,
            error_kind: None,
            arity: None,
        }
    }

    #[must_use]
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    pub fn is_union(&self) -> bool {
        !self.union.is_empty()
    }
}

/// Membership test: does `candidate` belong to `type_value`?
///
/// `type_value` must be a `Value::Type`; anything else is `false`.
pub fn check_value(type_value: &Value, candidate: &Value) -> bool {
    let Value::Type(t) = type_value else {
        return false;
    };
    let t = t.borrow();
    if t.is_union() {
        return t.union.iter().any(|member| check_value(member, candidate));
    }
    if let Some(tag) = t.builtin {
        return candidate.tag() == tag;
    }
    if let Some(kind) = t.error_kind {
        return matches!(candidate, Value::Error(e) if e.kind == kind);
    }
    // User type: the candidate's `type` spec slot must be this very type.
    if let Value::Object(obj) = candidate {
        if let Some(candidate_type) = obj.borrow().specs.get(&SpecName::Type) {
            return candidate_type.is_identical(type_value);
        }
    }
    false
}
