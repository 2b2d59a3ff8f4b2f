//! `LogRecord` — the value-type carrier that moves through the ring queue
//!
//! Modeled on the teacher's cache-aligned `MessageSlot`: a fixed-size,
//! trivially-copyable struct with a pre-allocated payload buffer so the
//! ring queue never has to allocate for an element.

use static_assertions::const_assert;

use crate::constants::{ MAX_PAYLOAD_SIZE, TRUNCATION_SUFFIX };
use crate::level::Level;

const_assert!(TRUNCATION_SUFFIX.len() < MAX_PAYLOAD_SIZE);

/// An immutable, fixed-size log entry produced on the caller's thread and
/// consumed by the single worker thread.
///
/// `LogRecord` is `Copy`: the queue element is POD, so enqueueing it is a
/// plain memory copy with no destructor to run and no lifetime to track.
#[derive(Clone, Copy)]
pub struct LogRecord {
    level: Level,
    timestamp_ns: i128,
    payload: [u8; MAX_PAYLOAD_SIZE],
    len: usize,
}

impl LogRecord {
    /// Build a record from already-formatted bytes, truncating with the
    /// `[TRUNCATED]` suffix if `bytes` does not fit in `MAX_PAYLOAD_SIZE`.
    pub fn make(level: Level, timestamp_ns: i128, bytes: &[u8]) -> Self {
        let mut payload = [0u8; MAX_PAYLOAD_SIZE];

        let len = if bytes.len() <= MAX_PAYLOAD_SIZE {
            payload[..bytes.len()].copy_from_slice(bytes);
            bytes.len()
        } else {
            let keep = MAX_PAYLOAD_SIZE - TRUNCATION_SUFFIX.len();
            payload[..keep].copy_from_slice(&bytes[..keep]);
            payload[keep..MAX_PAYLOAD_SIZE].copy_from_slice(TRUNCATION_SUFFIX);
            MAX_PAYLOAD_SIZE
        };

        Self { level, timestamp_ns, payload, len }
    }

    /// An empty record at the given level and timestamp (used as the default
    /// fill value for ring queue slots before anything is published into them).
    pub fn empty(level: Level, timestamp_ns: i128) -> Self {
        Self { level, timestamp_ns, payload: [0u8; MAX_PAYLOAD_SIZE], len: 0 }
    }

    /// Severity level of this record
    pub fn level(&self) -> Level {
        self.level
    }

    /// Nanoseconds since the Unix epoch when the record was created
    pub fn timestamp_ns(&self) -> i128 {
        self.timestamp_ns
    }

    /// The formatted payload bytes, `min(original_len, MAX_PAYLOAD_SIZE)` long
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.len]
    }

    /// Whether this record's payload was truncated to fit the slot
    pub fn is_truncated(&self) -> bool {
        self.len == MAX_PAYLOAD_SIZE && self.payload[self.len - TRUNCATION_SUFFIX.len()..self.len] == *TRUNCATION_SUFFIX
    }
}

impl Default for LogRecord {
    fn default() -> Self {
        Self::empty(Level::Debug, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_trip() {
        let rec = LogRecord::make(Level::Info, 123, b"hello");
        assert_eq!(rec.payload(), b"hello");
        assert_eq!(rec.level(), Level::Info);
        assert_eq!(rec.timestamp_ns(), 123);
        assert!(!rec.is_truncated());
    }

    #[test]
    fn test_empty_payload() {
        let rec = LogRecord::make(Level::Debug, 0, b"");
        assert_eq!(rec.payload(), b"");
        assert!(!rec.is_truncated());
    }

    #[test]
    fn test_oversize_payload_is_truncated_with_suffix() {
        let long = vec![b'x'; MAX_PAYLOAD_SIZE + 50];
        let rec = LogRecord::make(Level::Error, 0, &long);
        assert_eq!(rec.payload().len(), MAX_PAYLOAD_SIZE);
        assert!(rec.is_truncated());
        assert!(rec.payload().ends_with(TRUNCATION_SUFFIX));
    }

    #[test]
    fn test_exact_capacity_payload_is_not_truncated() {
        let exact = vec![b'y'; MAX_PAYLOAD_SIZE];
        let rec = LogRecord::make(Level::Warn, 0, &exact);
        assert_eq!(rec.payload().len(), MAX_PAYLOAD_SIZE);
        assert!(!rec.is_truncated());
    }

    #[test]
    fn test_record_is_copy() {
        let rec = LogRecord::make(Level::Debug, 1, b"copy me");
        let rec2 = rec;
        assert_eq!(rec.payload(), rec2.payload());
    }
}
