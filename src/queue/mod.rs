//! The lock-free SPSC ring queue used to hand `LogRecord`s from producer
//! threads to the single worker thread.

mod ring_queue;

pub use ring_queue::RingQueue;
