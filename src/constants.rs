//! Ring Log performance and configuration constants
//!
//! This module contains tuning constants and default values used throughout
//! the ring log engine, mirroring the defaults enumerated in the
//! configuration contract.

/// Default ring queue capacity (slots), rounded up to a power of two
pub const DEFAULT_QUEUE_CAPACITY: usize = 16_384;

/// Minimum allowed ring queue capacity after rounding
pub const MIN_QUEUE_CAPACITY: usize = 256;

/// Maximum allowed ring queue capacity after rounding
pub const MAX_QUEUE_CAPACITY: usize = 1_048_576;

/// Absolute floor for the ring queue: below this, size is rounded to 4
pub const ABSOLUTE_MIN_QUEUE_CAPACITY: usize = 4;

/// Maximum payload length carried by a single `LogRecord`, in bytes
pub const MAX_PAYLOAD_SIZE: usize = 1024;

/// Suffix written in place of truncated payload bytes
pub const TRUNCATION_SUFFIX: &[u8] = b"[TRUNCATED]";

/// Default thread-local formatting scratch size, in bytes
pub const DEFAULT_TLS_FORMAT_BUFFER_SIZE: usize = 4096;

/// Default worker UTF-16 scratch size, in code units (Windows console path)
pub const WORKER_UTF16_SCRATCH_LEN: usize = 2048;

/// Default worker file-batch buffer size, in bytes
pub const DEFAULT_WORKER_FILE_BUFFER_SIZE: usize = 32_768;

/// Flush trigger: fraction of the file batch buffer that must be filled
pub const FILE_BATCH_FLUSH_FILL_RATIO: f64 = 0.8;

/// Flush trigger: maximum age of the oldest unflushed byte, in milliseconds
pub const FILE_BATCH_FLUSH_MAX_AGE_MS: i64 = 100;

/// Default worker batch size (records popped per round)
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Minimum allowed worker batch size
pub const MIN_BATCH_SIZE: usize = 1;

/// Maximum allowed worker batch size
pub const MAX_BATCH_SIZE: usize = 1000;

/// Default idle sleep when the worker observes an empty queue, in microseconds
pub const DEFAULT_IDLE_SLEEP_US: u64 = 100;

/// Default drop-rate warning threshold, as a percentage
pub const DEFAULT_DROP_RATE_WARNING_THRESHOLD: f64 = 10.0;

/// Default rotation size threshold, in bytes (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default retention count of backup files (0 = unlimited)
pub const DEFAULT_MAX_BACKUP_FILES: usize = 10;

/// Default retention cumulative size, in bytes (100 MiB)
pub const DEFAULT_MAX_TOTAL_SIZE: u64 = 100 * 1024 * 1024;

/// Default retention age, in days
pub const DEFAULT_MAX_AGE_DAYS: u64 = 7;

/// Default log file path when a file sink is requested
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/app.log";

/// Cache line size for alignment optimizations (64 bytes on most modern CPUs)
pub const CACHE_LINE_SIZE: usize = 64;

/// ANSI SGR color code for debug-level lines (cyan)
pub const COLOR_DEBUG: u8 = 36;
/// ANSI SGR color code for info-level lines (green)
pub const COLOR_INFO: u8 = 32;
/// ANSI SGR color code for warn-level lines (yellow)
pub const COLOR_WARN: u8 = 33;
/// ANSI SGR color code for error-level lines (red)
pub const COLOR_ERROR: u8 = 31;
/// ANSI SGR reset code
pub const COLOR_RESET: u8 = 0;

/// Validate that the constants above are internally consistent
pub fn validate_constants() -> Result<(), &'static str> {
    if !DEFAULT_QUEUE_CAPACITY.is_power_of_two() {
        return Err("DEFAULT_QUEUE_CAPACITY must be a power of 2");
    }
    if !MAX_QUEUE_CAPACITY.is_power_of_two() {
        return Err("MAX_QUEUE_CAPACITY must be a power of 2");
    }
    if MIN_QUEUE_CAPACITY > MAX_QUEUE_CAPACITY {
        return Err("MIN_QUEUE_CAPACITY must not exceed MAX_QUEUE_CAPACITY");
    }
    if MAX_PAYLOAD_SIZE == 0 || TRUNCATION_SUFFIX.len() >= MAX_PAYLOAD_SIZE {
        return Err("MAX_PAYLOAD_SIZE must exceed the truncation suffix length");
    }
    if MIN_BATCH_SIZE == 0 || MIN_BATCH_SIZE > MAX_BATCH_SIZE {
        return Err("batch size bounds are invalid");
    }
    Ok(())
}
