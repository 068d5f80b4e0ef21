//! Search throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use root_mcts::games::tictactoe::{Board, TicTacToe};
use root_mcts::{Scheduler, SearchConfig, SearchTree};

fn bench_single_tree(c: &mut Criterion) {
    c.bench_function("tree_run_1000", |b| {
        b.iter(|| {
            let mut tree = SearchTree::new(
                TicTacToe,
                Board::empty(),
                SearchConfig::default().with_seed(42),
            );
            tree.flower().unwrap();
            tree.run(black_box(1000)).unwrap();
            tree.best_root_child().unwrap()
        });
    });
}

fn bench_root_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler_evaluate");
    for workers in [1usize, 2, 4] {
        group.bench_function(format!("{workers}_workers"), |b| {
            let scheduler = Scheduler::new(TicTacToe, SearchConfig::default());
            b.iter(|| {
                scheduler
                    .evaluate(&Board::empty(), workers, black_box(1000))
                    .unwrap()
                    .child_index
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_tree, bench_root_parallel);
criterion_main!(benches);
