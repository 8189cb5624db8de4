//! Criterion benchmarks for duplicate hook detection.
//!
//! Brute force against MinHash/LSH across batch sizes. Each batch has a few
//! planted duplicates so both paths do verification work.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use contentgate_quality::{BruteForce, DuplicateStrategy, Hook};

const THRESHOLD: f64 = 0.8;
const EPSILON: f64 = 0.05;
const SIZES: [usize; 4] = [50, 200, 500, 1000];

const VOCAB: [&str; 32] = [
    "growth", "pipeline", "founder", "hiring", "remote", "launch", "pricing", "churn",
    "retention", "brand", "story", "lesson", "mistake", "team", "product", "market",
    "sales", "funnel", "content", "audience", "scale", "budget", "revenue", "customer",
    "feedback", "roadmap", "culture", "leader", "habit", "focus", "metric", "signal",
];

fn make_hooks(n: usize) -> Vec<Hook> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut texts: Vec<String> = (0..n)
        .map(|_| {
            (0..10)
                .map(|_| {
                    state = state
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1442695040888963407);
                    VOCAB[(state >> 33) as usize % VOCAB.len()]
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    // one planted duplicate per 25 items
    for i in (0..n).step_by(25) {
        texts[(i + 7) % n] = texts[i].clone();
    }
    texts
        .into_iter()
        .enumerate()
        .map(|(i, t)| Hook::new(i, t))
        .collect()
}

fn bench_brute_force(c: &mut Criterion) {
    let mut group = c.benchmark_group("brute_force");
    group.sample_size(10);
    for size in SIZES {
        let hooks = make_hooks(size);
        let brute = BruteForce::new(true);
        group.bench_with_input(BenchmarkId::from_parameter(size), &hooks, |b, hooks| {
            b.iter(|| brute.find_pairs(black_box(hooks), THRESHOLD))
        });
    }
    group.finish();
}

#[cfg(feature = "minhash")]
fn bench_minhash(c: &mut Criterion) {
    use contentgate_quality::MinHashLsh;

    let mut group = c.benchmark_group("minhash_lsh");
    group.sample_size(10);
    for size in SIZES {
        let hooks = make_hooks(size);
        let Ok(lsh) = MinHashLsh::new(128, THRESHOLD, EPSILON, true) else {
            return;
        };
        group.bench_with_input(BenchmarkId::from_parameter(size), &hooks, |b, hooks| {
            b.iter(|| lsh.find_pairs(black_box(hooks), THRESHOLD))
        });
    }
    group.finish();
}

#[cfg(not(feature = "minhash"))]
fn bench_minhash(_c: &mut Criterion) {}

criterion_group!(benches, bench_brute_force, bench_minhash);
criterion_main!(benches);
