//! Benchmarks for pattern generation and transition ticks.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use nebula::field::{ParticleField, Snapshot};
use nebula::pattern::Pattern;
use nebula::transition::TransitionScheduler;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for pattern in Pattern::ALL {
        group.bench_with_input(BenchmarkId::new("25k", pattern.name()), &pattern, |b, &pattern| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| black_box(Snapshot::generate(pattern, 25_000, &mut rng)))
        });
    }

    group.finish();
}

fn bench_blend_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("blend_tick");

    for count in [1_000u32, 25_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut rng = StdRng::seed_from_u64(1);
            let mut field = ParticleField::new(count, Pattern::Sphere, &mut rng);
            // A tiny step keeps the transition from completing mid-bench.
            let mut scheduler = TransitionScheduler::new(1e-9).unwrap();
            scheduler.begin(&mut field, &mut rng);
            b.iter(|| black_box(scheduler.tick(&mut field)))
        });
    }

    group.finish();
}

fn bench_begin(c: &mut Criterion) {
    c.bench_function("begin_25k", |b| {
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = ParticleField::new(25_000, Pattern::Sphere, &mut rng);
        let mut scheduler = TransitionScheduler::default();
        b.iter(|| black_box(scheduler.begin(&mut field, &mut rng)))
    });
}

criterion_group!(benches, bench_generate, bench_blend_tick, bench_begin);
criterion_main!(benches);
