//! Lock-free single-producer single-consumer ring queue
//!
//! Modeled on the teacher's `RingBuffer`: a boxed slice of slots plus a pair
//! of cache-line padded atomic cursors, with raw-pointer slot access guarded
//! by the single-producer/single-consumer contract instead of a lock.

use std::cell::UnsafeCell;
use std::sync::atomic::{ AtomicUsize, Ordering };

use crate::error::{ LogEngineError, Result };

/// Cache-line padded atomic index to prevent false sharing between the
/// producer's tail and the consumer's head.
#[repr(align(64))]
struct PaddedIndex(AtomicUsize);

impl PaddedIndex {
    fn new(v: usize) -> Self {
        Self(AtomicUsize::new(v))
    }
}

/// Fixed-capacity, power-of-two SPSC ring queue of `T`.
///
/// One slot is always reserved to distinguish "empty" from "full": a queue
/// of capacity `N` holds at most `N - 1` live elements.
///
/// # Safety / concurrency contract
///
/// Exactly one thread may call `try_push`, and exactly one thread (which may
/// differ from the producer thread, but must be singular) may call
/// `try_pop`. Violating that contract is undefined behavior as the slot
/// access is not synchronized beyond the head/tail handoff.
pub struct RingQueue<T> {
    buffer: Box<[UnsafeCell<T>]>,
    mask: usize,
    head: PaddedIndex,
    tail: PaddedIndex,
}

unsafe impl<T: Send> Send for RingQueue<T> {}
unsafe impl<T: Send> Sync for RingQueue<T> {}

impl<T: Default + Clone> RingQueue<T> {
    /// Create a queue whose capacity is `requested` rounded up to the next
    /// power of two, clamped to `[4, usize::MAX / 2]`.
    pub fn new(requested: usize) -> Result<Self> {
        let capacity = Self::round_capacity(requested)?;
        let buffer = (0..capacity)
            .map(|_| UnsafeCell::new(T::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            buffer,
            mask: capacity - 1,
            head: PaddedIndex::new(0),
            tail: PaddedIndex::new(0),
        })
    }

    fn round_capacity(requested: usize) -> Result<usize> {
        let requested = requested.max(4);
        let rounded = requested.next_power_of_two();
        if rounded < 4 {
            return Ok(4);
        }
        if rounded == 0 || rounded > (usize::MAX / 2) {
            return Err(
                LogEngineError::capacity_too_large(
                    requested,
                    "rounding to the next power of two overflowed usize"
                )
            );
        }
        Ok(rounded)
    }

    /// Total number of slots, including the one reserved slot.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Attempt to push a value. Returns `false` without blocking if the
    /// queue would become full; the caller (producer) is responsible for
    /// counting the drop.
    ///
    /// Must only be called from the single producer thread.
    #[inline]
    pub fn try_push(&self, value: T) -> bool {
        let tail = self.tail.0.load(Ordering::Relaxed);
        let head = self.head.0.load(Ordering::Acquire);
        let next = (tail + 1) & self.mask;

        if next == head {
            return false;
        }

        unsafe {
            *self.buffer[tail & self.mask].get() = value;
        }
        self.tail.0.store(next, Ordering::Release);
        true
    }

    /// Attempt to pop a value. Returns `None` without blocking if the queue
    /// is empty.
    ///
    /// Must only be called from the single consumer thread.
    #[inline]
    pub fn try_pop(&self) -> Option<T> {
        let head = self.head.0.load(Ordering::Relaxed);
        let tail = self.tail.0.load(Ordering::Acquire);

        if head == tail {
            return None;
        }

        let value = unsafe { (*self.buffer[head & self.mask].get()).clone() };
        self.head.0.store((head + 1) & self.mask, Ordering::Release);
        Some(value)
    }

    /// Approximate number of queued elements. May observe a stale value
    /// under concurrent access, but is always `<= capacity() - 1`.
    pub fn size(&self) -> usize {
        let tail = self.tail.0.load(Ordering::Relaxed);
        let head = self.head.0.load(Ordering::Relaxed);
        tail.wrapping_sub(head) & self.mask
    }

    /// Whether the queue was observed empty at the time of the call.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spsc_correctness_scenario() {
        // Scenario 1 from spec.md §8: capacity 4 reserves one slot.
        let q: RingQueue<u32> = RingQueue::new(4).unwrap();
        assert_eq!(q.capacity(), 4);

        assert!(q.try_push(1));
        assert!(q.try_push(2));
        assert!(q.try_push(3));
        // Fourth push must fail: one slot is reserved.
        assert!(!q.try_push(4));

        assert_eq!(q.try_pop(), Some(1));
        assert_eq!(q.try_pop(), Some(2));
        assert_eq!(q.try_pop(), Some(3));
        assert_eq!(q.try_pop(), None);

        assert!(q.try_push(4));
        assert!(q.try_push(5));
        assert!(q.try_push(6));
        assert!(!q.try_push(7));
    }

    #[test]
    fn test_capacity_rounds_up_to_power_of_two() {
        let q: RingQueue<u8> = RingQueue::new(10).unwrap();
        assert_eq!(q.capacity(), 16);
    }

    #[test]
    fn test_capacity_of_one_rounds_to_minimum() {
        let q: RingQueue<u8> = RingQueue::new(1).unwrap();
        assert_eq!(q.capacity(), 4);
    }

    #[test]
    fn test_fifo_order_preserved() {
        let q: RingQueue<u32> = RingQueue::new(8).unwrap();
        for i in 0..7 {
            assert!(q.try_push(i));
        }
        assert!(!q.try_push(99));
        for i in 0..7 {
            assert_eq!(q.try_pop(), Some(i));
        }
        assert_eq!(q.try_pop(), None);
    }

    #[test]
    fn test_size_never_exceeds_capacity_minus_one() {
        let q: RingQueue<u32> = RingQueue::new(16).unwrap();
        for i in 0..100 {
            let _ = q.try_push(i);
            assert!(q.size() <= q.capacity() - 1);
        }
    }

    #[test]
    fn test_wraparound_after_many_cycles() {
        let q: RingQueue<u32> = RingQueue::new(4).unwrap();
        let mut produced = 0u32;
        let mut consumed = 0u32;
        for _ in 0..1000 {
            if q.try_push(produced) {
                produced += 1;
            }
            if let Some(v) = q.try_pop() {
                assert_eq!(v, consumed);
                consumed += 1;
            }
        }
        while let Some(v) = q.try_pop() {
            assert_eq!(v, consumed);
            consumed += 1;
        }
        assert_eq!(produced, consumed);
    }

    #[test]
    fn test_concurrent_spsc_preserves_fifo_and_counts() {
        use std::sync::Arc;
        use std::sync::atomic::{ AtomicUsize, Ordering as O };
        use std::thread;

        let q = Arc::new(RingQueue::<u64>::new(1024).unwrap());
        let dropped = Arc::new(AtomicUsize::new(0));
        const N: u64 = 200_000;

        let producer = {
            let q = Arc::clone(&q);
            let dropped = Arc::clone(&dropped);
            thread::spawn(move || {
                for i in 0..N {
                    while !q.try_push(i) {
                        dropped.fetch_add(1, O::Relaxed);
                        std::hint::spin_loop();
                    }
                }
            })
        };

        let consumer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                let mut next = 0u64;
                while next < N {
                    if let Some(v) = q.try_pop() {
                        assert_eq!(v, next);
                        next += 1;
                    }
                }
            })
        };

        producer.join().unwrap();
        consumer.join().unwrap();
        assert_eq!(q.size(), 0);
    }
}
