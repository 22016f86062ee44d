use criterion::{criterion_group, criterion_main, Criterion};

use mt_jump::{transition_matrix, Direction, JumpCache, LinearEngine, Mt19937, Tt800};
use mt_jump::params::Tt800Params;

fn bench_stepping(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    let mut engine = Mt19937::default();
    group.bench_function("mt19937_next", |b| b.iter(|| engine.next_word()));
    let mut engine = Mt19937::default();
    group.bench_function("mt19937_previous", |b| b.iter(|| engine.previous_word()));
    group.finish();
}

fn bench_jumps(c: &mut Criterion) {
    let mut group = c.benchmark_group("jump");
    group.sample_size(10);

    let t = transition_matrix::<Tt800Params>(Direction::Forward);
    group.bench_function("tt800_matrix_square", |b| b.iter(|| t.mul(&t)));
    group.bench_function("tt800_pow_2_40", |b| b.iter(|| t.pow(1 << 40)));

    let cache = JumpCache::in_memory(0);
    let mut warm = Tt800::default();
    warm.discard_with(&cache, 1 << 40).expect("warm cache");
    group.bench_function("tt800_cached_discard", |b| {
        b.iter(|| {
            let mut engine = Tt800::default();
            engine.discard_with(&cache, 1 << 40)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_stepping, bench_jumps);
criterion_main!(benches);
