//! Benchmarks for the waiting queue and best-fit allocation at scale.
//!
//! Each benchmark measures one more operation on top of a pre-filled
//! structure, so the numbers should stay flat as the fill grows.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use carpool_core::{Car, GroupId, Seats};
use carpool_placement::{AdmissionQueue, CapacityAllocator};

const FILLS: [u64; 3] = [10_000, 100_000, 1_000_000];

/// Cheap deterministic size in 1..=6.
fn size_for(id: u64) -> Seats {
    (id.wrapping_mul(2_654_435_761) % 6) as Seats + 1
}

fn filled_queue(n: u64) -> AdmissionQueue {
    let mut queue = AdmissionQueue::default();
    for id in 0..n {
        let _ = queue.enqueue(GroupId(id), size_for(id));
    }
    queue
}

fn bench_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("admission_queue");
    group.sample_size(20);

    for n in FILLS {
        let queue = filled_queue(n);

        group.bench_with_input(BenchmarkId::new("enqueue", n), &queue, |b, queue| {
            b.iter_batched_ref(
                || queue.clone(),
                |q| {
                    let _ = q.enqueue(GroupId(n + 1), black_box(3));
                },
                BatchSize::LargeInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("first_fitting", n), &queue, |b, queue| {
            b.iter(|| black_box(queue.first_fitting(black_box(4))))
        });

        group.bench_with_input(BenchmarkId::new("remove_middle", n), &queue, |b, queue| {
            b.iter_batched_ref(
                || queue.clone(),
                |q| {
                    let _ = q.remove(GroupId(n / 2));
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_allocator(c: &mut Criterion) {
    let mut group = c.benchmark_group("capacity_allocator");
    group.sample_size(20);

    for n in FILLS {
        let cars = (0..n).map(|id| Car::new(id, size_for(id) + 1));
        let Ok(allocator) = CapacityAllocator::new(cars) else {
            continue;
        };

        group.bench_with_input(BenchmarkId::new("place", n), &allocator, |b, allocator| {
            b.iter_batched_ref(
                || allocator.clone(),
                |a| black_box(a.place(GroupId(0), black_box(4))),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_queue, bench_allocator);
criterion_main!(benches);
