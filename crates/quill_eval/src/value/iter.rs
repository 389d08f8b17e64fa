//! Iterator state.
//!
//! Iterating a collection produces an `Iterator` value holding one of
//! these states; the `next` slot advances it and raises the
//! `StopIteration` signal on exhaustion. List iteration is live (it
//! indexes the shared storage), dict and string iteration snapshot at
//! creation time.

use crate::value::{Heap, Shared, Value};

#[derive(Debug)]
pub enum IterState {
    List {
        items: Shared<Vec<Value>>,
        pos: usize,
    },
    Tuple {
        items: Heap<Vec<Value>>,
        pos: usize,
    },
    /// Pre-collected values (string characters, dict keys).
    Snapshot {
        items: Vec<Value>,
        pos: usize,
    },
    Range {
        next: f64,
        end: f64,
        step: f64,
    },
    /// An object supplying its own `next` spec.
    Custom {
        target: Value,
    },
}
