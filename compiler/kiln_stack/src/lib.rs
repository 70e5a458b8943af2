//! Stack growth for the recursive descent parser and the tree-walking
//! evaluator.
//!
//! Both walk the syntax tree with native recursion, so a deeply nested
//! expression or a deep chain of user calls can outrun the thread's stack.
//! Wrapping each recursive step in [`ensure_sufficient_stack`] moves the
//! work onto a freshly allocated segment whenever the remaining space drops
//! under the red zone. On wasm the guard is a passthrough.

/// Grow when fewer than this many bytes remain.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if it is close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
