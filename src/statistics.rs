//! Cheap observability: atomic counters and a point-in-time snapshot
//!
//! Modeled on the teacher's `PerformanceMonitor`, trimmed to the counters
//! spec.md §4.7 actually asks for.

use std::sync::atomic::{ AtomicUsize, Ordering };

use crate::constants::DEFAULT_DROP_RATE_WARNING_THRESHOLD;

/// Atomic counters tracked by the logger over its lifetime.
///
/// `enabled` gates every `record_*` call (spec.md §4.8: `enable_statistics`
/// "toggle counters"); when disabled the counters stay at zero for the
/// logger's whole lifetime rather than merely being hidden from the snapshot.
pub struct Statistics {
    enabled: bool,
    processed: AtomicUsize,
    dropped: AtomicUsize,
    rotations: AtomicUsize,
}

/// A consistent-per-field, but not cross-field atomic, point-in-time read
/// of the logger's counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    /// Records successfully enqueued, formatted, and emitted
    pub processed: usize,
    /// Records dropped because the ring queue was full
    pub dropped: usize,
    /// Number of completed file rotations
    pub rotations: usize,
    /// `dropped / (processed + dropped)`, or `0.0` if nothing has happened yet
    pub drop_rate: f64,
}

impl Statistics {
    /// Create a fresh, all-zero counter set. `enabled` mirrors the
    /// configured `enable_statistics` option; when `false`, every
    /// `record_*` call is a no-op.
    pub fn new(enabled: bool) -> Self {
        Self { enabled, processed: AtomicUsize::new(0), dropped: AtomicUsize::new(0), rotations: AtomicUsize::new(0) }
    }

    /// Record one successfully processed record.
    pub fn record_processed(&self) {
        if self.enabled {
            self.processed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record one dropped record.
    pub fn record_dropped(&self) {
        if self.enabled {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record one completed rotation.
    pub fn record_rotation(&self) {
        if self.enabled {
            self.rotations.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Read a consistent-per-field snapshot of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        let processed = self.processed.load(Ordering::Acquire);
        let dropped = self.dropped.load(Ordering::Acquire);
        let rotations = self.rotations.load(Ordering::Acquire);
        let total = processed + dropped;
        let drop_rate = if total == 0 { 0.0 } else { (dropped as f64 / total as f64) * 100.0 };

        StatsSnapshot { processed, dropped, rotations, drop_rate }
    }
}

impl StatsSnapshot {
    /// Whether the observed drop rate exceeds the configured warning threshold.
    pub fn exceeds_threshold(&self, threshold_percent: f64) -> bool {
        self.drop_rate > threshold_percent
    }
}

impl Default for StatsSnapshot {
    fn default() -> Self {
        Self { processed: 0, dropped: 0, rotations: 0, drop_rate: 0.0 }
    }
}

/// Validate a configured drop-rate warning threshold per spec.md §8's
/// boundary behaviors: a negative value is nonsensical and falls back to
/// the documented default, while an overly large value is simply clamped
/// to the 100% ceiling.
pub fn clamp_drop_rate_threshold(value: f64) -> f64 {
    if value < 0.0 {
        DEFAULT_DROP_RATE_WARNING_THRESHOLD
    } else if value > 100.0 {
        100.0
    } else {
        value
    }
}
