//! Stack safety for recursive reduction and step dispatch.
//!
//! Sub-parses re-enter the reducer on the same stack, and compilation steps
//! usually recurse into child nodes. Both recurse as deep as the input nests,
//! so every recursive entry point runs through [`ensure_sufficient_stack`].
//!
//! Stack growth only keeps deep input from crashing. Bounding how deep the
//! reducer may nest is a separate, configurable limit in `ctk_parse`.
//!
//! # Platform Support
//!
//! - **Native targets**: Uses the `stacker` crate to grow the stack on demand.
//! - **WASM targets**: No-op passthrough.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone, a new segment is allocated
/// before calling `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
