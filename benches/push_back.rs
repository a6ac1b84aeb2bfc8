use criterion::{black_box, criterion_group, criterion_main, Criterion};
use simple_vector::{reserve, SimpleVector};

fn bench_push_std(c: &mut Criterion) {
    c.bench_function("std_vec_push", |b| {
        b.iter(|| {
            let mut v = Vec::new();
            for i in 0..1000 {
                v.push(black_box(i));
            }
            v
        })
    });
}

fn bench_push_back(c: &mut Criterion) {
    c.bench_function("simple_vector_push_back", |b| {
        b.iter(|| {
            let mut v = SimpleVector::new();
            for i in 0..1000 {
                v.push_back(black_box(i)).unwrap();
            }
            v
        })
    });
}

fn bench_push_back_reserved(c: &mut Criterion) {
    c.bench_function("simple_vector_push_back_reserved", |b| {
        b.iter(|| {
            let mut v = SimpleVector::with_reserved(reserve(1000)).unwrap();
            for i in 0..1000 {
                v.push_back(black_box(i)).unwrap();
            }
            v
        })
    });
}

fn bench_insert_front(c: &mut Criterion) {
    c.bench_function("simple_vector_insert_front", |b| {
        b.iter(|| {
            let mut v = SimpleVector::with_reserved(reserve(256)).unwrap();
            for i in 0..256 {
                v.insert(0, black_box(i)).unwrap();
            }
            v
        })
    });
}

criterion_group!(benches, bench_push_std, bench_push_back, bench_push_back_reserved, bench_insert_front);
criterion_main!(benches);
