//! The "emergency console" path (spec.md §7/GLOSSARY): a minimal,
//! best-effort write to standard error used only for logger-internal
//! failures (file open/write/rename failures, invalid config values). The
//! engine cannot depend on itself for self-diagnosis, so this never goes
//! through the ring queue.
//!
//! Lifecycle events (construction, worker start/stop, rotation) are
//! reported separately through `tracing`, at `trace`/`debug` granularity,
//! strictly as an observability layer — never on the hot path.

/// Report an internal warning that does not stop the logger.
pub fn emergency_warn(message: impl std::fmt::Display) {
    eprintln!("[ringlog] warning: {message}");
}

/// Report an internal error that does not stop the logger (e.g. a failed
/// flush or rename); the worker continues on the next tick.
pub fn emergency_error(message: impl std::fmt::Display) {
    eprintln!("[ringlog] error: {message}");
}
