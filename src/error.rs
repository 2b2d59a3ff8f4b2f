//! Error types and handling for the ring log engine

use thiserror::Error;

/// Result type alias for ring log operations
pub type Result<T> = std::result::Result<T, LogEngineError>;

/// Main error type for the ring log engine.
///
/// Only construction-time failures are fatal (see spec.md §7); everything
/// that can happen on the hot path or inside the worker loop is handled by
/// the engine itself and never reaches this type.
#[derive(Error, Debug)]
pub enum LogEngineError {
    /// I/O errors from opening or reading a configuration/log file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested ring queue capacity overflowed when rounded to a power of two
    #[error("requested capacity {requested} is too large: {message}")]
    CapacityTooLarge {
        /// The capacity the caller requested
        requested: usize,
        /// Description of why rounding failed
        message: String,
    },

    /// Allocation failure during logger construction
    #[error("out of memory during construction: {message}")]
    OutOfMemory {
        /// Description of the allocation that failed
        message: String,
    },

    /// Invalid configuration parameter (construction-time, fatal only if unrecoverable)
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration issue
        message: String,
    },

    /// Generic error for conditions that should not happen in a correctly
    /// functioning engine, such as a poisoned lock.
    #[error("unexpected error: {message}")]
    Unexpected {
        /// Description of the unexpected condition
        message: String,
    },
}

impl LogEngineError {
    /// Create a new invalid-configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    /// Create a new capacity-too-large error
    pub fn capacity_too_large(requested: usize, message: impl Into<String>) -> Self {
        Self::CapacityTooLarge { requested, message: message.into() }
    }

    /// Create a new out-of-memory error
    pub fn out_of_memory(message: impl Into<String>) -> Self {
        Self::OutOfMemory { message: message.into() }
    }

    /// Create a new unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected { message: message.into() }
    }

    /// Whether this failure is something a caller could plausibly retry
    /// after adjusting its configuration, as opposed to a hard bug.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::InvalidConfig { .. })
    }
}
