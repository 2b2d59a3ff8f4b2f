//! Criterion benchmark for the SPSC ring queue's raw push/pop throughput.
//!
//! Trimmed from the teacher's `bench_criterion.rs`: a single producer
//! thread and a single consumer thread exchange a fixed number of
//! records over the queue, and we measure the pairs/sec rate.
//!
//! Run: cargo bench --bench ring_queue_throughput

use criterion::{ criterion_group, criterion_main, BenchmarkId, Criterion, Throughput };
use std::sync::Arc;
use std::thread;

use ringlog::record::LogRecord;
use ringlog::level::Level;
use ringlog::RingQueue;

const QUEUE_CAPACITY: usize = 16_384;

fn spsc_round_trip(events: u64) -> u64 {
    let queue = Arc::new(RingQueue::<LogRecord>::new(QUEUE_CAPACITY).unwrap());

    let consumer_queue = Arc::clone(&queue);
    let consumer = thread::spawn(move || {
        let mut received = 0u64;
        while received < events {
            if consumer_queue.try_pop().is_some() {
                received += 1;
            } else {
                std::hint::spin_loop();
            }
        }
        received
    });

    let mut sent = 0u64;
    while sent < events {
        let record = LogRecord::make(Level::Info, sent as i128, b"benchmark payload");
        if queue.try_push(record) {
            sent += 1;
        } else {
            std::hint::spin_loop();
        }
    }

    consumer.join().unwrap()
}

fn bench_ring_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_queue_spsc");

    for &events in &[10_000u64, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(events));
        group.bench_with_input(BenchmarkId::new("round_trip", events), &events, |b, &events| {
            b.iter(|| spsc_round_trip(events));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ring_queue);
criterion_main!(benches);
