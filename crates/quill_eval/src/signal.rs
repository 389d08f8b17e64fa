//! Non-local exit signals.
//!
//! `return`, `break` and `continue` are not errors: they are structural
//! exits consumed by the construct they target. Threading them through
//! every evaluation result as a sum type keeps them exhaustively checked
//! and impossible to confuse with the user-catchable error taxonomy —
//! `try`/`catch` only ever sees [`Signal::Error`].

use crate::errors::RuntimeError;
use crate::value::Value;

/// The error side of every evaluation result.
#[derive(Clone, Debug)]
pub enum Signal {
    /// A typed runtime error; the only variant `try`/`catch` can consume.
    Error(RuntimeError),
    /// `return` — unwinds to the nearest function-call boundary.
    Return(Value),
    /// `break n` — unwinds through `n` enclosing loops. Each loop
    /// decrements the amount and re-raises while it stays positive.
    Break(f64),
    /// `continue n` — like `Break` but resumes the targeted loop.
    Continue(f64),
    /// Iterator exhaustion. Consumed by loop and iteration code only;
    /// never escapes to user code.
    StopIteration,
}

/// Result of evaluating anything.
pub type EvalResult = Result<Value, Signal>;

impl Signal {
    /// True for the control-flow variants (everything but `Error`).
    pub fn is_control(&self) -> bool {
        !matches!(self, Signal::Error(_))
    }
}

impl From<RuntimeError> for Signal {
    fn from(err: RuntimeError) -> Self {
        Signal::Error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::type_error;

    #[test]
    fn error_is_not_control() {
        assert!(!Signal::from(type_error("x")).is_control());
        assert!(Signal::Return(Value::Null).is_control());
        assert!(Signal::Break(1.0).is_control());
        assert!(Signal::StopIteration.is_control());
    }
}
