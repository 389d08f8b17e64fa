//! Error payload objects.

use crate::errors::{ErrorKind, RuntimeError};
use crate::value::Value;

/// A typed error as a first-class value.
///
/// Produced when an error is caught (so `catch` can bind something
/// inspectable) and by calling the built-in error types directly, e.g.
/// `TypeError("message")`.
#[derive(Clone, Debug)]
pub struct ErrorValue {
    pub kind: ErrorKind,
    pub message: String,
    pub payload: Option<Value>,
}

impl ErrorValue {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ErrorValue {
            kind,
            message: message.into(),
            payload: None,
        }
    }

    /// Snapshot of an unwinding error, minus its trace.
    pub fn from_runtime(err: &RuntimeError) -> Self {
        ErrorValue {
            kind: err.kind,
            message: err.message.clone(),
            payload: err.payload.clone(),
        }
    }

    /// Turn back into a raiseable error.
    pub fn to_runtime(&self) -> RuntimeError {
        let mut err = RuntimeError::new(self.kind, self.message.clone());
        if let Some(payload) = &self.payload {
            err = err.with_payload(payload.clone());
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::type_error;

    #[test]
    fn round_trips_kind_and_message() {
        let original = type_error("bad operand");
        let value = ErrorValue::from_runtime(&original);
        let back = value.to_runtime();
        assert_eq!(back.kind, ErrorKind::TypeError);
        assert_eq!(back.message, "bad operand");
    }
}
