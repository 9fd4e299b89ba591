use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use flakeid::{
    AtomicSnowflakeGenerator, IdGenerator, LockSnowflakeGenerator, NoJitter, SystemClock,
    ThreadRandom, TimeSource, decode, encode_id,
};
use std::{
    sync::{
        Arc, Barrier,
        atomic::{AtomicU64, Ordering},
    },
    thread::scope,
    time::Instant,
};

/// A clock that advances one millisecond every 4096 reads, so the hot path
/// never waits for the wall clock.
struct TickingMockTime {
    reads: AtomicU64,
}

impl TimeSource for TickingMockTime {
    fn current_millis(&self) -> u64 {
        self.reads.fetch_add(1, Ordering::Relaxed) / 4096 + 1
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

/// Benchmarks a hot-path generator where the clock never stalls.
fn bench_generator<G>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: IdGenerator,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().unwrap());
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks generators sharing the wall clock across threads, including
/// the wait for the next millisecond once a sequence is exhausted.
fn bench_generator_threaded<G>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    G: IdGenerator + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);
    for threads in [1, 2, 4, 8] {
        group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));
        group.bench_function(format!("threads/{threads}/elems/{TOTAL_IDS}"), |b| {
            b.iter_custom(|iters| {
                let generator = Arc::new(generator_factory());
                let barrier = Arc::new(Barrier::new(threads + 1));
                let start = scope(|s| {
                    for _ in 0..threads {
                        let generator = Arc::clone(&generator);
                        let barrier = Arc::clone(&barrier);
                        s.spawn(move || {
                            barrier.wait();
                            for _ in 0..iters {
                                for _ in 0..TOTAL_IDS {
                                    black_box(generator.next_id().unwrap());
                                }
                            }
                        });
                    }
                    barrier.wait();
                    Instant::now()
                });
                start.elapsed()
            });
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(1));
    group.bench_function("encode_id", |b| {
        b.iter(|| encode_id(black_box(123_456_789), black_box(512), black_box(77)));
    });
    group.bench_function("decode", |b| {
        let id = encode_id(123_456_789, 512, 77);
        b.iter(|| decode(black_box(id)));
    });
    group.finish();
}

fn benchmarks(c: &mut Criterion) {
    bench_codec(c);

    bench_generator(c, "atomic/mock", || {
        AtomicSnowflakeGenerator::with_parts(
            0,
            TickingMockTime {
                reads: AtomicU64::new(0),
            },
            NoJitter,
        )
        .unwrap()
    });
    bench_generator(c, "lock/mock", || {
        LockSnowflakeGenerator::with_parts(
            0,
            TickingMockTime {
                reads: AtomicU64::new(0),
            },
            NoJitter,
        )
        .unwrap()
    });

    bench_generator_threaded(c, "atomic/wallclock", || {
        AtomicSnowflakeGenerator::with_parts(0, SystemClock::default(), ThreadRandom).unwrap()
    });
    bench_generator_threaded(c, "lock/wallclock", || {
        LockSnowflakeGenerator::with_parts(0, SystemClock::default(), ThreadRandom).unwrap()
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
