//! Criterion micro-benchmarks for link creation and teardown.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tether_core::{Observer, Subject};

fn bench_attach_detach_pair(c: &mut Criterion) {
    let subject = Subject::new();
    let observer = Observer::new(|_: u64| {});
    c.bench_function("attach_detach_pair", |b| {
        b.iter(|| {
            subject.attach(black_box(&observer));
            subject.detach(black_box(&observer));
        });
    });
}

fn bench_clear_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("clear_fan_out");
    for &n in &[8usize, 64, 512] {
        let subject = Subject::new();
        let observers: Vec<Observer<u64>> =
            (0..n).map(|_| Observer::new(|_: u64| {})).collect();
        group.bench_function(format!("observers_{n}"), |b| {
            b.iter(|| {
                for observer in &observers {
                    subject.attach(observer);
                }
                subject.clear();
            });
        });
    }
    group.finish();
}

fn bench_subject_clone(c: &mut Criterion) {
    let subject = Subject::new();
    let observers: Vec<Observer<u64>> =
        (0..64).map(|_| Observer::new(|_: u64| {})).collect();
    for observer in &observers {
        subject.attach(observer);
    }
    c.bench_function("subject_clone_64_links", |b| {
        b.iter(|| black_box(subject.clone()));
    });
}

criterion_group!(
    benches,
    bench_attach_detach_pair,
    bench_clear_fan_out,
    bench_subject_clone
);
criterion_main!(benches);
