//! Stack growth for the recursive parser and evaluator.
//!
//! Deeply nested input (long `else if` chains, nested groupings, recursive
//! calls) recurses once per level. Wrapping each level in
//! [`ensure_sufficient_stack`] lets the call-depth limit of the evaluator be
//! reached before the native stack runs out.

/// Grow the stack when less than this remains.
const RED_ZONE: usize = 64 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
