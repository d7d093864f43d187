//! Ride Ledger Benchmarks
//!
//! Measures the cross-linked operations at several ledger sizes.
//!
//! ## Running
//!
//! ```sh
//! cargo bench --bench ledger_bench
//! ```
//!
//! ## Workloads
//!
//! - **insert**: fill an empty ledger with scrambled keys and priorities
//! - **drain**: fill, then `extract_min` until empty
//! - **cancel**: fill, then cancel every key from the key side
//! - **churn**: steady-state mix of insert / update / cancel / extract_min
//! - **range**: fixed-width range lookups on a full ledger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ride_ledger::RideLedger;

// ============================================================================
// Simple PRNG for reproducible benchmarks
// ============================================================================

/// Linear congruential generator for reproducible random numbers
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Lcg { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state >> 33
    }

    fn below(&mut self, bound: u64) -> i64 {
        (self.next() % bound) as i64
    }
}

const SIZES: [i64; 3] = [1_000, 10_000, 100_000];

fn filled(n: i64) -> RideLedger {
    let mut ledger = RideLedger::with_capacity(n as usize);
    let mut rng = Lcg::new(42);
    for i in 0..n {
        let _ = ledger.insert((i * 7919) % n, rng.below(1000), 1 + rng.below(100));
    }
    ledger
}

fn benchmark_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for n in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(filled(n)))
        });
    }
    group.finish();
}

fn benchmark_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("drain");
    for n in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || filled(n),
                |mut ledger| {
                    while let Some(record) = ledger.extract_min() {
                        black_box(record);
                    }
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn benchmark_cancel(c: &mut Criterion) {
    let mut group = c.benchmark_group("cancel");
    for n in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || filled(n),
                |mut ledger| {
                    for key in 0..n {
                        black_box(ledger.cancel(key));
                    }
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn benchmark_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    for n in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || (filled(n), Lcg::new(7)),
                |(mut ledger, mut rng)| {
                    for _ in 0..1000 {
                        let key = rng.below(2 * n as u64);
                        match rng.below(4) {
                            0 => {
                                let _ = ledger.insert(key, rng.below(1000), 1 + rng.below(100));
                            }
                            1 => {
                                black_box(ledger.update(key, 1 + rng.below(150)));
                            }
                            2 => {
                                black_box(ledger.cancel(key));
                            }
                            _ => {
                                black_box(ledger.extract_min());
                            }
                        }
                    }
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn benchmark_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_lookup");
    for n in SIZES {
        let ledger = filled(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut rng = Lcg::new(99);
            b.iter(|| {
                let low = rng.below(n as u64);
                black_box(ledger.range_lookup(low, low + 64))
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_drain,
    benchmark_cancel,
    benchmark_churn,
    benchmark_range,
);

criterion_main!(benches);
