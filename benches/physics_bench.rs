use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use impulse2d::*;
use std::hint::black_box;

const DT: f32 = 1.0 / 30.0;

fn prepare_world(columns: usize, rows: usize) -> PhysicsWorld {
    let mut world = PhysicsWorld::default();
    world.add_body(RigidBody::fixed(
        Vec2::ZERO,
        Vec2::new(columns as f32 * 1.5 + 2.0, 1.0),
    ));
    for row in 0..rows {
        for column in 0..columns {
            let x = column as f32 * 2.5 - columns as f32 * 1.25;
            let y = 2.0 + row as f32 * 2.0;
            world.add_body(RigidBody::new_box(Vec2::new(x, y), Vec2::ONE, 1.0));
        }
    }
    // Settle so the measured steps run with warm contacts.
    for _ in 0..30 {
        world.step(DT);
    }
    world
}

fn bench_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");
    for &(columns, rows) in &[(4usize, 4usize), (8, 8), (16, 8)] {
        let count = columns * rows;
        group.bench_with_input(
            BenchmarkId::new("sequential", count),
            &(columns, rows),
            |b, &(columns, rows)| {
                let mut world = prepare_world(columns, rows);
                world.set_parallel_enabled(false);
                b.iter(|| world.step(black_box(DT)))
            },
        );
        group.bench_with_input(
            BenchmarkId::new("parallel", count),
            &(columns, rows),
            |b, &(columns, rows)| {
                let mut world = prepare_world(columns, rows);
                world.set_parallel_enabled(true);
                b.iter(|| world.step(black_box(DT)))
            },
        );
    }
    group.finish();
}

fn bench_narrowphase(c: &mut Criterion) {
    let mut group = c.benchmark_group("sat_narrowphase");
    let count = 1000;

    let pairs: Vec<(RigidBody, RigidBody)> = (0..count)
        .map(|i| {
            let x = i as f32 * 3.0;
            let a = RigidBody::new_box(Vec2::new(x, 0.0), Vec2::splat(0.5), 1.0);
            let b = RigidBody::new_box(Vec2::new(x + 0.8, 0.3), Vec2::splat(0.5), 1.0)
                .with_rotation(i as f32 * 0.01);
            (a, b)
        })
        .collect();

    group.bench_function("overlapping_pairs", |b| {
        b.iter(|| {
            for (a, body_b) in &pairs {
                black_box(NarrowPhase::manifold(a, body_b));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_world_step, bench_narrowphase);
criterion_main!(benches);
