//! Dict storage: insertion-ordered entries with a hash index.
//!
//! Keys are hashed through the `hash` protocol slot and compared through
//! `eq`, so anything hashable — including user objects with a custom
//! `hash` spec — can key a dict. Entries store the key value itself, so
//! the original key identity survives.
//!
//! `DictValue` is pure storage. The operations that need protocol
//! dispatch (insert, get, contains) live beside the dispatcher and
//! compute hashes *before* borrowing the storage, since hashing may run
//! user code.

use rustc_hash::FxHashMap;

use crate::value::Value;

#[derive(Debug, Default)]
pub struct DictValue {
    /// Entries in insertion order.
    entries: Vec<(Value, Value)>,
    /// hash -> indices into `entries` (collisions resolved via `eq`).
    index: FxHashMap<u64, Vec<usize>>,
}

impl DictValue {
    pub fn new() -> Self {
        DictValue::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }

    /// Indices whose keys share `hash` (cloned out so no borrow is held
    /// while the caller runs `eq` dispatch).
    pub fn bucket(&self, hash: u64) -> Vec<usize> {
        self.index.get(&hash).cloned().unwrap_or_default()
    }

    pub fn key_at(&self, idx: usize) -> Value {
        self.entries[idx].0.clone()
    }

    pub fn value_at(&self, idx: usize) -> Value {
        self.entries[idx].1.clone()
    }

    /// Overwrite the value of an existing entry, keeping the original key.
    pub fn set_value_at(&mut self, idx: usize, value: Value) {
        self.entries[idx].1 = value;
    }

    /// Append a new entry under `hash`.
    pub fn push_entry(&mut self, hash: u64, key: Value, value: Value) {
        let idx = self.entries.len();
        self.entries.push((key, value));
        self.index.entry(hash).or_default().push(idx);
    }

    pub fn keys(&self) -> Vec<Value> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, v)| v.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_insertion_order() {
        let mut dict = DictValue::new();
        dict.push_entry(1, Value::str("b"), Value::num(2.0));
        dict.push_entry(2, Value::str("a"), Value::num(1.0));
        let keys: Vec<_> = dict
            .entries()
            .iter()
            .map(|(k, _)| match k {
                Value::Str(s) => s.as_str().to_string(),
                _ => panic!("expected str key"),
            })
            .collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn bucket_collects_colliding_indices() {
        let mut dict = DictValue::new();
        dict.push_entry(7, Value::num(1.0), Value::Null);
        dict.push_entry(7, Value::num(2.0), Value::Null);
        assert_eq!(dict.bucket(7), vec![0, 1]);
        assert!(dict.bucket(8).is_empty());
    }

    #[test]
    fn set_value_keeps_original_key() {
        let mut dict = DictValue::new();
        let key = Value::str("k");
        dict.push_entry(9, key.clone(), Value::num(1.0));
        dict.set_value_at(0, Value::num(2.0));
        assert!(dict.key_at(0).is_identical(&key));
        assert!(dict.value_at(0).is_identical(&Value::num(2.0)));
    }
}
