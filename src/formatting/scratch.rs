//! Per-thread formatting scratch buffer with a reentrancy guard
//!
//! Each producer thread gets its own zero-initialized scratch buffer on
//! first use; it is owned by the thread and reclaimed at thread exit.
//! Logging from within a formatter (e.g. a `Display` impl that itself
//! calls back into the logger) is detected and the inner call is silently
//! discarded rather than deadlocking or blowing the stack.

use std::cell::{ Cell, RefCell };

use crate::constants::DEFAULT_TLS_FORMAT_BUFFER_SIZE;

thread_local! {
    static SCRATCH: RefCell<FormattingScratch> = RefCell::new(FormattingScratch::new(DEFAULT_TLS_FORMAT_BUFFER_SIZE));
    static IS_FORMATTING: Cell<bool> = Cell::new(false);
}

/// Thread-local scratch buffer used by the zero-allocation formatting path.
pub struct FormattingScratch {
    buf: Vec<u8>,
    size: usize,
}

impl FormattingScratch {
    fn new(size: usize) -> Self {
        Self { buf: vec![0u8; size], size }
    }

    /// Resize this thread's scratch buffer (e.g. to honor a non-default
    /// `tls_format_buffer_size` from configuration). Reentrant-safe: only
    /// takes effect between formatting calls.
    pub fn resize(&mut self, size: usize) {
        if size != self.size {
            self.buf = vec![0u8; size];
            self.size = size;
        }
    }

    /// The scratch buffer as a mutable slice, for the caller to format into.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Capacity of the scratch buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.size
    }
}

/// Run `f` while holding this thread's reentrancy guard, honoring the same
/// "inner call discarded" contract as [`with_scratch`]. Used by formatting
/// paths (e.g. the dynamic allocator) that don't need the scratch buffer
/// itself but must still not recurse into a formatter already in progress.
/// Returns `None` if a formatter recursively attempted to log.
pub fn with_reentrancy_guard<R>(f: impl FnOnce() -> R) -> Option<R> {
    let already_formatting = IS_FORMATTING.with(|flag| flag.replace(true));
    if already_formatting {
        // Restore the flag exactly as we found it (still set by the outer call).
        IS_FORMATTING.with(|flag| flag.set(true));
        return None;
    }

    let result = f();
    IS_FORMATTING.with(|flag| flag.set(false));
    Some(result)
}

/// Run `f` with this thread's formatting scratch buffer, honoring the
/// reentrancy guard. Returns `None` if a formatter recursively attempted to
/// log (the inner call is discarded per spec.md §4.3/§7).
pub fn with_scratch<R>(tls_size: usize, f: impl FnOnce(&mut [u8]) -> R) -> Option<R> {
    with_reentrancy_guard(|| {
        SCRATCH.with(|scratch| {
            let mut scratch = scratch.borrow_mut();
            scratch.resize(tls_size);
            f(scratch.as_mut_slice())
        })
    })
}
