//! Stack growth guard.
//!
//! The parser and the interpreter both recurse to the depth of the
//! program's nesting. Wrapping each recursive entry point in
//! [`ensure_sufficient_stack`] grows the call stack on demand, so deeply
//! nested input degrades into extra allocation instead of a stack
//! overflow abort.

/// Remaining stack below which we grow (64 KiB).
const RED_ZONE: usize = 64 * 1024;

/// Size of each additional stack segment (2 MiB).
const GROWTH: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if little space remains.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_result() {
        assert_eq!(ensure_sufficient_stack(|| 7), 7);
    }

    #[test]
    fn survives_deep_recursion() {
        fn count(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { count(n - 1) + 1 })
        }
        assert_eq!(count(200_000), 200_000);
    }
}
