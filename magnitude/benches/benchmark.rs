use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use magnitude::{factoring::prime_factorization, mag, Magnitude};

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("Factor Semiprime", |b| {
        b.iter(|| black_box(prime_factorization(black_box(4_294_967_291 * 4_294_967_279))))
    });

    c.bench_function("Magnitude Product", |b| {
        let inch = mag(254) / mag(10_000);
        let foot = mag(12) * &inch;
        b.iter(|| black_box(black_box(&foot) / black_box(&inch)))
    });

    let degree = Magnitude::pi() / mag(180);
    c.bench_function("Irrational Value", |b| {
        b.iter(|| black_box(black_box(&degree).get_value::<f64>()))
    });

    let root = mag(7).root(3).unwrap();
    c.bench_function("Root Value", |b| {
        b.iter(|| black_box(black_box(&root).get_value::<f32>()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
