use criterion::{black_box, criterion_group, criterion_main, Criterion};

use shogi_adviser::*;

criterion_group!(benches, bench);
criterion_main!(benches);

pub fn bench(c: &mut Criterion) {
    let state = GameState::startpos();

    c.bench_function("best_move_depth2", |b| {
        b.iter(|| best_move(black_box(&state), SENTE, SearchConfig::new(2, 0)))
    });

    c.bench_function("perft_depth2", |b| {
        b.iter(|| perft_count(&mut GameState::startpos(), black_box(2)))
    });
}
