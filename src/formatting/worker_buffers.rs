//! Consumer-owned, pre-allocated worker buffers
//!
//! Sized once at construction and never grown at runtime, per spec.md §4.3.

use std::sync::atomic::{ AtomicI64, AtomicUsize, Ordering };

use crate::constants::WORKER_UTF16_SCRATCH_LEN;

/// Buffers owned exclusively by the worker thread: a format scratch, a
/// UTF-16 scratch for the Windows console path, and the file batch buffer.
pub struct WorkerBuffers {
    format: Vec<u8>,
    utf16: Vec<u16>,
    file_batch: Vec<u8>,
    file_batch_len: AtomicUsize,
    last_flush_ms: AtomicI64,
}

impl WorkerBuffers {
    /// Allocate worker buffers once. `format_size` should be at least the
    /// configured `tls_format_buffer_size`; `file_buffer_size` is the
    /// configured `worker_file_buffer_size`.
    pub fn new(format_size: usize, file_buffer_size: usize) -> Self {
        Self {
            format: vec![0u8; format_size.max(1)],
            utf16: vec![0u16; WORKER_UTF16_SCRATCH_LEN],
            file_batch: vec![0u8; file_buffer_size],
            file_batch_len: AtomicUsize::new(0),
            last_flush_ms: AtomicI64::new(0),
        }
    }

    /// The pre-allocated format scratch, for the worker to render a line into.
    pub fn format_scratch(&mut self) -> &mut [u8] {
        &mut self.format
    }

    /// The pre-allocated UTF-16 scratch used by the Windows console path.
    pub fn utf16_scratch(&mut self) -> &mut [u16] {
        &mut self.utf16
    }

    /// The file batch buffer's full backing storage.
    pub fn file_batch(&mut self) -> &mut [u8] {
        &mut self.file_batch
    }

    /// Capacity of the file batch buffer.
    pub fn file_batch_capacity(&self) -> usize {
        self.file_batch.len()
    }

    /// Current number of valid bytes accumulated in the file batch buffer.
    pub fn file_batch_len(&self) -> usize {
        self.file_batch_len.load(Ordering::Acquire)
    }

    pub(crate) fn set_file_batch_len(&self, len: usize) {
        self.file_batch_len.store(len, Ordering::Release);
    }

    /// Milliseconds since the Unix epoch of the last successful flush.
    pub fn last_flush_ms(&self) -> i64 {
        self.last_flush_ms.load(Ordering::Acquire)
    }

    pub(crate) fn set_last_flush_ms(&self, ms: i64) {
        self.last_flush_ms.store(ms, Ordering::Release);
    }
}
