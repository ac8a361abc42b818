use std::hint::black_box;

use conversion::{synthesize, ConversionCache};
use criterion::{criterion_group, criterion_main, Criterion};
use magnitude::mag;
use rep::{RepKind, ScalarKind, ScalarValue, Value};

fn criterion_benchmark(c: &mut Criterion) {
    let (old, new) = (RepKind::Real(ScalarKind::U16), RepKind::Real(ScalarKind::I8));
    let factor = mag(3) / mag(1000);

    c.bench_function("Synthesize", |b| {
        b.iter(|| black_box(synthesize(black_box(old), black_box(new), black_box(&factor))))
    });

    let cache = ConversionCache::new();
    c.bench_function("Cached Synthesize", |b| {
        b.iter(|| black_box(cache.get(black_box(old), black_box(new), black_box(&factor))))
    });

    let op = synthesize(old, new, &factor).unwrap();
    let value = Value::Real(ScalarValue::U16(40_000));
    c.bench_function("Apply Sequence", |b| {
        b.iter(|| black_box(op.apply(black_box(value))))
    });

    c.bench_function("Overflow Bounds", |b| {
        b.iter(|| black_box(black_box(&op).would_overflow(black_box(&value))))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
