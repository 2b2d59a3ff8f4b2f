//! The single consumer thread: drains the queue in bounded batches,
//! formats and emits each record, and drives flush/rotation timing
//! (spec.md §4.4).

use std::io::Write as _;
use std::sync::atomic::{ AtomicBool, AtomicU8, Ordering };
use std::sync::Arc;

use crate::constants::COLOR_RESET;
use crate::diagnostics::{ emergency_error, emergency_warn };
use crate::formatting::WorkerBuffers;
use crate::level::Level;
use crate::queue::RingQueue;
use crate::record::LogRecord;
use crate::rotation::RotationManager;
use crate::sink::{ self, FileBatcher, OutputTarget };
use crate::statistics::Statistics;
use crate::utils::{ now_nanos, split_seconds_and_nanos };

/// The worker's lifecycle state (spec.md §4.4: `running -> draining -> stopped`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    Running = 0,
    Draining = 1,
    Stopped = 2,
}

/// Everything the worker thread owns exclusively. Constructed once by
/// [`crate::logger::AsyncLogger`] and moved into the spawned thread.
pub struct WorkerLoop {
    queue: Arc<RingQueue<LogRecord>>,
    stats: Arc<Statistics>,
    shutdown: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
    buffers: WorkerBuffers,
    file_batcher: Option<FileBatcher>,
    rotation: Option<RotationManager>,
    output_target: OutputTarget,
    batch_size: usize,
    idle_sleep_us: u64,
}

impl WorkerLoop {
    /// Construct the worker. `state` is shared with the orchestrator so
    /// [`crate::logger::AsyncLogger`] can report the current lifecycle
    /// phase without joining the thread. Level filtering happens entirely
    /// on the producer side (spec.md §4.8), so the worker has no notion
    /// of a minimum level.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        queue: Arc<RingQueue<LogRecord>>,
        stats: Arc<Statistics>,
        shutdown: Arc<AtomicBool>,
        state: Arc<AtomicU8>,
        buffers: WorkerBuffers,
        file_batcher: Option<FileBatcher>,
        rotation: Option<RotationManager>,
        output_target: OutputTarget,
        batch_size: usize,
        idle_sleep_us: u64
    ) -> Self {
        Self {
            queue,
            stats,
            shutdown,
            state,
            buffers,
            file_batcher,
            rotation,
            output_target,
            batch_size,
            idle_sleep_us,
        }
    }

    /// Run the worker loop to completion. Returns when the shutdown flag
    /// is observed and the queue has been drained and flushed.
    pub fn run(mut self) {
        self.state.store(WorkerState::Running as u8, Ordering::Release);
        tracing::debug!("ringlog worker started");

        loop {
            let popped = self.drain_batch();

            if popped == 0 {
                if self.shutdown.load(Ordering::Acquire) && self.queue.is_empty() {
                    break;
                }
                crate::utils::idle_sleep(self.idle_sleep_us);
            }

            self.maybe_rotate();
        }

        self.state.store(WorkerState::Draining as u8, Ordering::Release);
        tracing::debug!("ringlog worker draining: flushing final batch");
        self.flush_and_close();
        self.state.store(WorkerState::Stopped as u8, Ordering::Release);
        tracing::debug!("ringlog worker stopped");
    }

    fn drain_batch(&mut self) -> usize {
        let mut popped = 0;
        for _ in 0..self.batch_size {
            match self.queue.try_pop() {
                Some(record) => {
                    self.emit(&record);
                    popped += 1;
                }
                None => break,
            }
        }
        popped
    }

    fn emit(&mut self, record: &LogRecord) {
        let format_buf = self.buffers.format_scratch();
        let len = format_line(format_buf, record);
        let line = &format_buf[..len];

        // Tee policy (spec.md §9, open question resolved in DESIGN.md):
        // file first, then console; a console failure never suppresses
        // the already-committed file write.
        if self.output_target.wants_file() {
            self.write_to_file(line);
        }

        if self.output_target.wants_console() {
            let utf16_scratch = self.buffers.utf16_scratch();
            sink::write_console(line, utf16_scratch);
        }

        self.stats.record_processed();
    }

    fn write_to_file(&mut self, line: &[u8]) {
        let Some(batcher) = self.file_batcher.as_mut() else { return };

        match batcher.append(&mut self.buffers, line) {
            Ok(written) => {
                if written > 0 {
                    if let Some(rotation) = self.rotation.as_ref() {
                        rotation.record_write(written as u64);
                    }
                }
            }
            Err(e) => {
                emergency_error(format!("file write failed: {e}"));
            }
        }
    }

    fn maybe_rotate(&mut self) {
        let Some(rotation) = self.rotation.as_ref() else { return };
        let Some(batcher) = self.file_batcher.as_mut() else { return };

        let now = crate::utils::now_millis() / 1000;
        if !rotation.should_rotate(now) {
            return;
        }

        match rotation.rotate(batcher.path(), now) {
            Ok(crate::rotation::RotateOutcome::Rotated { backup_path }) => {
                tracing::debug!(?backup_path, "log file rotated");
                self.stats.record_rotation();
                if let Err(e) = batcher.reopen() {
                    emergency_error(format!("failed to reopen log file after rotation: {e}"));
                }
            }
            Ok(_) => {}
            Err(e) => {
                emergency_error(format!("rotation failed, will retry next tick: {e}"));
            }
        }
    }

    fn flush_and_close(&mut self) {
        if let Some(batcher) = self.file_batcher.as_mut() {
            if let Err(e) = batcher.flush(&mut self.buffers) {
                emergency_warn(format!("final flush failed: {e}"));
            }
        }
    }
}

/// Render one record as `\x1b[<color>m[<seconds>.<nanos:9>] \x1b[<color>m<LEVEL>\x1b[0m <payload>\n`
/// directly into `scratch` with zero heap allocation, truncating (rather
/// than growing the buffer) if the line does not fit.
///
/// Writing through `&mut [u8]`'s `io::Write` impl rather than building a
/// `String` is what makes the zero-allocation worker path genuine (see
/// DESIGN.md — spec.md §9 flags the source's emission path as allocating
/// even in zero-alloc mode, which this implementation does not reproduce).
fn format_line(scratch: &mut [u8], record: &LogRecord) -> usize {
    let (secs, nanos) = split_seconds_and_nanos(record.timestamp_ns());
    let color = record.level().color_code();
    let label = record.level().label();
    let reset = COLOR_RESET;

    let capacity = scratch.len();
    let mut cursor: &mut [u8] = scratch;

    let _ = write!(cursor, "\x1b[{color}m[{secs}.{nanos:09}] \x1b[{color}m{label}\x1b[{reset}m ");
    let _ = cursor.write_all(record.payload());
    let _ = cursor.write_all(b"\n");

    capacity - cursor.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_contains_payload_and_reset() {
        let mut scratch = [0u8; 256];
        let record = LogRecord::make(Level::Info, now_nanos(), b"hello");
        let len = format_line(&mut scratch, &record);
        let line = std::str::from_utf8(&scratch[..len]).unwrap();
        assert!(line.ends_with("hello\n"));
        assert!(line.contains("INFO"));
        assert!(line.contains("\x1b[32m"));
        assert!(line.contains("\x1b[0m"));
    }

    #[test]
    fn test_format_line_truncates_into_tight_scratch() {
        let mut scratch = [0u8; 8];
        let record = LogRecord::make(Level::Error, 0, b"this payload is way too long for 8 bytes");
        let len = format_line(&mut scratch, &record);
        assert_eq!(len, 8);
    }

    #[test]
    fn test_empty_payload_emits_header_only_line() {
        let mut scratch = [0u8; 256];
        let record = LogRecord::make(Level::Debug, 0, b"");
        let len = format_line(&mut scratch, &record);
        let line = std::str::from_utf8(&scratch[..len]).unwrap();
        assert!(line.ends_with("\x1b[0m \n"));
    }
}
