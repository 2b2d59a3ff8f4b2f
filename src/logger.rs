//! `AsyncLogger` — the orchestrator that owns the queue, worker buffers,
//! file handle, and worker thread, and exposes the producer-facing API
//! (spec.md §4.9).

use std::fmt;
use std::sync::atomic::{ AtomicBool, AtomicU8, Ordering };
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::config::RingLogConfig;
use crate::error::{ LogEngineError, Result };
use crate::formatting::{ with_reentrancy_guard, with_scratch, WorkerBuffers };
use crate::level::Level;
use crate::queue::RingQueue;
use crate::record::LogRecord;
use crate::rotation::RotationManager;
use crate::sink::FileBatcher;
use crate::statistics::{ StatsSnapshot, Statistics };
use crate::utils::now_nanos;
use crate::worker::{ WorkerLoop, WorkerState };

/// Producer-facing, thread-safe handle to the logging engine. Constructed
/// once; `Drop` signals and joins the worker thread for a graceful
/// shutdown (spec.md §3, "Lifecycles").
pub struct AsyncLogger {
    queue: Arc<RingQueue<LogRecord>>,
    stats: Arc<Statistics>,
    shutdown: Arc<AtomicBool>,
    worker_state: Arc<AtomicU8>,
    min_level: Arc<AtomicU8>,
    tls_format_buffer_size: usize,
    resolved_strategy: crate::formatting::ResolvedStrategy,
    worker_handle: Option<JoinHandle<()>>,
}

impl AsyncLogger {
    /// Construct the logger: allocate the queue and worker buffers, open
    /// the file sink if configured, and spawn the single worker thread.
    ///
    /// Allocation failures are fatal per spec.md §4.9; a file-open failure
    /// is not — it is reported through the emergency console path and the
    /// logger continues without a file sink.
    pub fn new(config: RingLogConfig) -> Result<Self> {
        crate::constants::validate_constants().map_err(LogEngineError::config)?;

        let queue = Arc::new(RingQueue::<LogRecord>::new(config.queue_capacity)?);
        let stats = Arc::new(Statistics::new(config.enable_statistics));
        let shutdown = Arc::new(AtomicBool::new(false));
        let worker_state = Arc::new(AtomicU8::new(WorkerState::Running as u8));
        let min_level = Arc::new(AtomicU8::new(config.min_level as u8));
        let resolved_strategy = config.allocation_strategy.resolve();

        let buffers = WorkerBuffers::new(config.tls_format_buffer_size, config.worker_file_buffer_size);

        let (file_batcher, rotation) = if config.output_target.wants_file() {
            match FileBatcher::open(&config.log_file_path) {
                Ok(batcher) => {
                    let now_secs = now_nanos() / 1_000_000_000;
                    let rotation = RotationManager::new(config.rotation_config(), now_secs as i64);
                    (Some(batcher), Some(rotation))
                }
                Err(e) => {
                    crate::diagnostics::emergency_warn(
                        format!("failed to open log file {:?}: {e}; continuing without file sink", config.log_file_path)
                    );
                    (None, None)
                }
            }
        } else {
            (None, None)
        };

        let worker = WorkerLoop::new(
            Arc::clone(&queue),
            Arc::clone(&stats),
            Arc::clone(&shutdown),
            Arc::clone(&worker_state),
            buffers,
            file_batcher,
            rotation,
            config.output_target,
            config.batch_size,
            config.idle_sleep_us
        );

        let worker_handle = std::thread::Builder
            ::new()
            .name("ringlog-worker".into())
            .spawn(move || worker.run())
            .map_err(|e| LogEngineError::unexpected(format!("failed to spawn worker thread: {e}")))?;

        tracing::debug!(queue_capacity = queue.capacity(), "ringlog engine constructed");

        Ok(Self {
            queue,
            stats,
            shutdown,
            worker_state,
            min_level,
            tls_format_buffer_size: config.tls_format_buffer_size,
            resolved_strategy,
            worker_handle: Some(worker_handle),
        })
    }

    /// Producer entry point: level-filter, format into scratch, enqueue.
    /// On a full queue, increments the dropped counter instead of
    /// blocking (spec.md §4.9/§7).
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if level < self.current_level() {
            return;
        }

        let record = match self.resolved_strategy {
            crate::formatting::ResolvedStrategy::ZeroAlloc => self.format_zero_alloc(level, args),
            crate::formatting::ResolvedStrategy::Dynamic => self.format_dynamic(level, args),
        };

        let Some(record) = record else {
            // Reentrant formatter call; silently discarded per spec.md §4.3/§7.
            return;
        };

        if !self.queue.try_push(record) {
            self.stats.record_dropped();
        }
    }

    fn format_zero_alloc(&self, level: Level, args: fmt::Arguments<'_>) -> Option<LogRecord> {
        use std::io::Write;

        with_scratch(self.tls_format_buffer_size, |buf| {
            let capacity = buf.len();
            let mut cursor: &mut [u8] = buf;
            let _ = cursor.write_fmt(args);
            let len = capacity - cursor.len();
            LogRecord::make(level, now_nanos(), &buf[..len])
        })
    }

    fn format_dynamic(&self, level: Level, args: fmt::Arguments<'_>) -> Option<LogRecord> {
        with_reentrancy_guard(|| {
            let formatted = fmt::format(args);
            LogRecord::make(level, now_nanos(), formatted.as_bytes())
        })
    }

    /// `debug(template, args)` shortcut.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    /// `info(template, args)` shortcut.
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    /// `warn(template, args)` shortcut.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    /// `error(template, args)` shortcut.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    /// Atomically update the producer-side minimum level. Takes effect
    /// for subsequent `log` calls only.
    pub fn set_level(&self, level: Level) {
        self.min_level.store(level as u8, Ordering::Relaxed);
    }

    fn current_level(&self) -> Level {
        Level::from_u8(self.min_level.load(Ordering::Relaxed))
    }

    /// Snapshot of the engine's counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Current worker lifecycle phase.
    pub fn worker_state(&self) -> WorkerState {
        match self.worker_state.load(Ordering::Acquire) {
            0 => WorkerState::Running,
            1 => WorkerState::Draining,
            _ => WorkerState::Stopped,
        }
    }

    /// Approximate number of records currently queued.
    pub fn queue_len(&self) -> usize {
        self.queue.size()
    }
}

impl Drop for AsyncLogger {
    /// Cooperative shutdown: raise the flag, let the worker drain and
    /// flush, then join. The log file is closed last, when the worker
    /// thread's `FileBatcher` is dropped.
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.worker_handle.take() {
            let _ = handle.join();
        }
    }
}
