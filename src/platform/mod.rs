//! Platform-specific storage strategy for `last_rotation_time`
//!
//! On targets with native 64-bit atomics, `last_rotation_time` is held in
//! an `AtomicI64`. On 32-bit targets that lack native 64-bit atomic
//! read-modify-write (32-bit ARM, 32-bit MIPS, 32-bit RISC-V and similar),
//! the same value is guarded by a mutex instead, so the rotation predicate
//! semantics are unchanged regardless of which storage is selected. See
//! spec.md §9, "64-bit atomics on 32-bit platforms".

#[cfg(target_has_atomic = "64")]
mod atomic_cell {
    use std::sync::atomic::{ AtomicI64, Ordering };

    /// A 64-bit timestamp cell, atomic where the target supports it.
    pub struct TimeCell(AtomicI64);

    impl TimeCell {
        pub fn new(value: i64) -> Self {
            Self(AtomicI64::new(value))
        }

        pub fn load(&self) -> i64 {
            self.0.load(Ordering::Acquire)
        }

        pub fn store(&self, value: i64) {
            self.0.store(value, Ordering::Release);
        }
    }
}

#[cfg(not(target_has_atomic = "64"))]
mod atomic_cell {
    use parking_lot::Mutex;

    /// A 64-bit timestamp cell, mutex-guarded on targets without native
    /// 64-bit atomics.
    pub struct TimeCell(Mutex<i64>);

    impl TimeCell {
        pub fn new(value: i64) -> Self {
            Self(Mutex::new(value))
        }

        pub fn load(&self) -> i64 {
            *self.0.lock()
        }

        pub fn store(&self, value: i64) {
            *self.0.lock() = value;
        }
    }
}

pub use atomic_cell::TimeCell;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_cell_round_trip() {
        let cell = TimeCell::new(0);
        assert_eq!(cell.load(), 0);
        cell.store(123_456);
        assert_eq!(cell.load(), 123_456);
    }
}
