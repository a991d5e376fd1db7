use criterion::{black_box, criterion_group, criterion_main, Criterion};
use grade_curve::{adjust, Statistics};

fn class_scores(len: usize) -> Vec<f64> {
    (0..len).map(|i| (i * 37 % 101) as f64).collect()
}

pub fn adjust_identity_benchmark(c: &mut Criterion) {
    let scores = class_scores(300);

    c.bench_function("adjust identity", |b| {
        b.iter(|| adjust(black_box(&scores), 0, 0.0, 0))
    });
}

pub fn adjust_all_steps_benchmark(c: &mut Criterion) {
    let scores = class_scores(300);

    c.bench_function("adjust all steps", |b| {
        b.iter(|| adjust(black_box(&scores), 5, -0.4, 20))
    });
}

pub fn statistics_benchmark(c: &mut Criterion) {
    let scores = adjust(&class_scores(300), 5, -0.4, 20);

    c.bench_function("compute statistics", |b| {
        b.iter(|| Statistics::compute(black_box(&scores)))
    });
}

criterion_group!(
    benches,
    adjust_identity_benchmark,
    adjust_all_steps_benchmark,
    statistics_benchmark
);
criterion_main!(benches);
