//! Benchmarks for ckmeans classification

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nitramap_algorithms::classification::ckmeans;

fn create_values(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| ((i * 7919) % 1000) as f64 / 10.0 + ((i * 31) % 17) as f64)
        .collect()
}

fn bench_ckmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("ckmeans_k5");

    for n in [1_000, 10_000, 100_000].iter() {
        let values = create_values(*n);

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| ckmeans(black_box(&values), 5).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ckmeans);
criterion_main!(benches);
