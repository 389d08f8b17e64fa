//! Runtime values.
//!
//! Every runtime object is a [`Value`]: a cheaply clonable enum whose
//! heap-backed kinds share storage through [`Heap`] (immutable) or
//! [`Shared`] (interior-mutable) wrappers. All heap allocation goes
//! through the `Value::` factory methods.
//!
//! The interpreter is single-threaded; `Rc` is intentional.

mod dict;
mod error_val;
mod func;
mod iter;
mod object;
mod type_val;

pub use dict::DictValue;
pub use error_val::ErrorValue;
pub use func::{CallArgs, FuncBody, FuncValue, NativeFn, ParamDefault, ParamSpec};
pub use iter::IterState;
pub use object::ObjectValue;
pub use type_val::{check_value, TypeValue};

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared immutable storage.
///
/// `#[repr(transparent)]` over `Rc<T>`; construction only through
/// [`Heap::new`], so every allocation site is a factory method.
#[repr(transparent)]
pub struct Heap<T: ?Sized>(Rc<T>);

impl<T> Heap<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Heap(Rc::new(value))
    }
}

impl<T: ?Sized> Heap<T> {
    /// Reference identity, used by `===`.
    #[inline]
    pub fn ptr_eq(a: &Heap<T>, b: &Heap<T>) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> std::ops::Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Shared mutable storage (`Rc<RefCell<T>>` behind a factory).
///
/// Borrows are short-lived by convention: nothing re-enters the
/// interpreter while a borrow is held.
#[repr(transparent)]
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Shared(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn ptr_eq(a: &Shared<T>, b: &Shared<T>) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&self.0).finish()
    }
}

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Num(f64),
    Str(Heap<String>),
    List(Shared<Vec<Value>>),
    Tuple(Heap<Vec<Value>>),
    Dict(Shared<DictValue>),
    Func(Heap<FuncValue>),
    /// Wraps a zero-argument function invoked automatically on read.
    Property(Heap<FuncValue>),
    Type(Shared<TypeValue>),
    /// Named attribute bag. Objects double as scopes: the environment is
    /// a chain of these, linked through their `parent` slot.
    Object(Shared<ObjectValue>),
    Iterator(Shared<IterState>),
    Error(Heap<ErrorValue>),
}

/// Kind tag, used for type checks and error messages.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueTag {
    Null,
    Bool,
    Num,
    Str,
    List,
    Tuple,
    Dict,
    Func,
    Property,
    Type,
    Object,
    Iterator,
    Error,
}

impl ValueTag {
    pub fn name(self) -> &'static str {
        match self {
            ValueTag::Null => "Null",
            ValueTag::Bool => "Bool",
            ValueTag::Num => "Num",
            ValueTag::Str => "Str",
            ValueTag::List => "List",
            ValueTag::Tuple => "Tuple",
            ValueTag::Dict => "Dict",
            ValueTag::Func => "Func",
            ValueTag::Property => "Property",
            ValueTag::Type => "Type",
            ValueTag::Object => "Object",
            ValueTag::Iterator => "Iterator",
            ValueTag::Error => "Error",
        }
    }
}

// Factory methods — the only way heap values are built.

impl Value {
    #[inline]
    pub fn num(n: f64) -> Self {
        Value::Num(n)
    }

    #[inline]
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Shared::new(items))
    }

    #[inline]
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    #[inline]
    pub fn dict(dict: DictValue) -> Self {
        Value::Dict(Shared::new(dict))
    }

    #[inline]
    pub fn func(func: FuncValue) -> Self {
        Value::Func(Heap::new(func))
    }

    #[inline]
    pub fn property(func: FuncValue) -> Self {
        Value::Property(Heap::new(func))
    }

    #[inline]
    pub fn type_value(type_val: TypeValue) -> Self {
        Value::Type(Shared::new(type_val))
    }

    #[inline]
    pub fn object(object: ObjectValue) -> Self {
        Value::Object(Shared::new(object))
    }

    #[inline]
    pub fn iterator(state: IterState) -> Self {
        Value::Iterator(Shared::new(state))
    }

    #[inline]
    pub fn error(error: ErrorValue) -> Self {
        Value::Error(Heap::new(error))
    }
}

impl Value {
    #[inline]
    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Null => ValueTag::Null,
            Value::Bool(_) => ValueTag::Bool,
            Value::Num(_) => ValueTag::Num,
            Value::Str(_) => ValueTag::Str,
            Value::List(_) => ValueTag::List,
            Value::Tuple(_) => ValueTag::Tuple,
            Value::Dict(_) => ValueTag::Dict,
            Value::Func(_) => ValueTag::Func,
            Value::Property(_) => ValueTag::Property,
            Value::Type(_) => ValueTag::Type,
            Value::Object(_) => ValueTag::Object,
            Value::Iterator(_) => ValueTag::Iterator,
            Value::Error(_) => ValueTag::Error,
        }
    }

    /// Kind name for error messages.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.tag().name()
    }

    /// Reference identity — the `===` operator. Inline kinds compare by
    /// value, heap kinds by pointer.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Num(a), Value::Num(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => Heap::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Shared::ptr_eq(a, b),
            (Value::Tuple(a), Value::Tuple(b)) => Heap::ptr_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => Shared::ptr_eq(a, b),
            (Value::Func(a), Value::Func(b)) => Heap::ptr_eq(a, b),
            (Value::Property(a), Value::Property(b)) => Heap::ptr_eq(a, b),
            (Value::Type(a), Value::Type(b)) => Shared::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Shared::ptr_eq(a, b),
            (Value::Iterator(a), Value::Iterator(b)) => Shared::ptr_eq(a, b),
            (Value::Error(a), Value::Error(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_for_inline_kinds_is_value_equality() {
        assert!(Value::Null.is_identical(&Value::Null));
        assert!(Value::num(3.0).is_identical(&Value::num(3.0)));
        assert!(!Value::num(3.0).is_identical(&Value::num(4.0)));
        assert!(!Value::Null.is_identical(&Value::Bool(false)));
    }

    #[test]
    fn identity_for_heap_kinds_is_pointer_equality() {
        let a = Value::list(vec![Value::num(1.0)]);
        let b = a.clone();
        let c = Value::list(vec![Value::num(1.0)]);
        assert!(a.is_identical(&b));
        assert!(!a.is_identical(&c));
    }

    #[test]
    fn tags_name_their_kind() {
        assert_eq!(Value::Null.type_name(), "Null");
        assert_eq!(Value::str("x").type_name(), "Str");
        assert_eq!(Value::tuple(vec![]).type_name(), "Tuple");
    }
}
