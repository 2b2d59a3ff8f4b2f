//! ringlog - lock-free, drop-tolerant async logging engine for IoT and
//! embedded ARM targets.
//!
//! A single producer-facing [`AsyncLogger`] decouples any number of
//! caller threads from one consumer worker thread via a lock-free SPSC
//! [`RingQueue`]. The worker formats, batches, and emits records to
//! console and/or a rotating log file.

pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod formatting;
pub mod level;
pub mod logger;
pub mod platform;
pub mod queue;
pub mod record;
pub mod rotation;
pub mod sink;
pub mod statistics;
pub mod utils;
pub mod worker;

pub use config::{ ConfigLoader, RingLogConfig };
pub use error::{ LogEngineError, Result };
pub use level::Level;
pub use logger::AsyncLogger;
pub use queue::RingQueue;
pub use record::LogRecord;
pub use statistics::StatsSnapshot;
pub use worker::WorkerState;

/// Crate version, exposed for diagnostics and the demo binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
