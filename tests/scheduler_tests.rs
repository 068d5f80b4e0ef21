//! Root-parallelization integration tests.

use proptest::prelude::*;

use root_mcts::games::tictactoe::{Board, Cell, TicTacToe};
use root_mcts::{
    merge_child_stats, ChildStats, GameEngine, Scheduler, SearchConfig, SearchError,
};

fn scheduler_with_seed(seed: u64) -> Scheduler<TicTacToe> {
    Scheduler::new(TicTacToe, SearchConfig::default().with_seed(seed))
}

// =============================================================================
// Validity across worker counts
// =============================================================================

#[test]
fn test_returns_legal_index_single_worker() {
    let decision = scheduler_with_seed(42)
        .evaluate(&Board::empty(), 1, 400)
        .unwrap();

    assert!(decision.child_index < 9);
    assert!(TicTacToe.legal_moves(&Board::empty()).contains(&decision.action));
}

#[test]
fn test_returns_legal_index_four_workers() {
    // Same total budget as the single-worker case: parallelism changes
    // variance, not validity.
    let decision = scheduler_with_seed(42)
        .evaluate(&Board::empty(), 4, 100)
        .unwrap();

    assert!(decision.child_index < 9);
    assert!(TicTacToe.legal_moves(&Board::empty()).contains(&decision.action));
}

#[test]
fn test_merged_stats_cover_full_budget() {
    // Every iteration backpropagates through exactly one root child (the
    // root is fully flowered), so the winner's merged visits are bounded by
    // the total budget and the aggregate iteration count matches it.
    let decision = scheduler_with_seed(9).evaluate(&Board::empty(), 4, 250).unwrap();
    assert_eq!(decision.stats.iterations, 1000);
    assert!(decision.visits > 0);
    assert!(decision.visits <= 1000);
}

// =============================================================================
// Forced and degenerate roots
// =============================================================================

#[test]
fn test_single_legal_move_returns_index_zero() {
    // X: 0, 2, 3, 7 / O: 1, 4, 5, 6 — only cell 8 is open.
    let board = Board::from_moves(&[0, 1, 2, 4, 3, 5, 7, 6]).unwrap();

    for workers in [1, 2, 4, 8] {
        let decision = scheduler_with_seed(42).evaluate(&board, workers, 50).unwrap();
        assert_eq!(decision.child_index, 0);
        assert_eq!(decision.action, Cell(8));
    }
}

#[test]
fn test_no_legal_moves_is_reported() {
    // X already won; no legal moves remain.
    let board = Board::from_moves(&[0, 3, 1, 4, 2]).unwrap();

    let err = scheduler_with_seed(42).evaluate(&board, 4, 100).unwrap_err();
    assert_eq!(err, SearchError::NoLegalMoves);
}

#[test]
fn test_zero_workers_clamps_to_one() {
    let decision = scheduler_with_seed(42).evaluate(&Board::empty(), 0, 100).unwrap();
    assert!(decision.child_index < 9);
}

// =============================================================================
// Search quality
// =============================================================================

#[test]
fn test_finds_immediate_winning_move() {
    // X: 0, 1 / O: 3, 4 — X to move; a3 (cell 2) wins on the spot.
    let board = Board::from_moves(&[0, 3, 1, 4]).unwrap();

    let decision = scheduler_with_seed(42).evaluate(&board, 4, 2000).unwrap();
    assert_eq!(decision.action, Cell(2));
}

#[test]
fn test_blocks_immediate_loss() {
    // X: 0, 8 / O: 3, 4 — X to move; anything but c2 (cell 5) lets O win
    // with 3-4-5 next turn.
    let board = Board::from_moves(&[0, 3, 8, 4]).unwrap();

    let decision = scheduler_with_seed(42).evaluate(&board, 4, 3000).unwrap();
    assert_eq!(decision.action, Cell(5));
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_same_seed_same_decision() {
    let a = scheduler_with_seed(1234).evaluate(&Board::empty(), 3, 300).unwrap();
    let b = scheduler_with_seed(1234).evaluate(&Board::empty(), 3, 300).unwrap();

    assert_eq!(a.child_index, b.child_index);
    assert_eq!(a.visits, b.visits);
    assert_eq!(a.total_score, b.total_score);
}

// =============================================================================
// Merge properties
// =============================================================================

proptest! {
    #[test]
    fn prop_merge_is_order_independent(
        trees in prop::collection::vec(
            prop::collection::vec((0u64..10_000, -100.0f64..100.0), 5),
            1..6,
        ),
        seed in any::<u64>(),
    ) {
        let as_stats: Vec<Vec<ChildStats>> = trees
            .iter()
            .map(|t| {
                t.iter()
                    .map(|&(visits, total_score)| ChildStats { visits, total_score })
                    .collect()
            })
            .collect();

        let mut forward = vec![ChildStats::default(); 5];
        for t in &as_stats {
            merge_child_stats(&mut forward, t);
        }

        // Shuffle the merge order with a cheap LCG on the seed.
        let mut order: Vec<usize> = (0..as_stats.len()).collect();
        let mut s = seed;
        for i in (1..order.len()).rev() {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            order.swap(i, (s % (i as u64 + 1)) as usize);
        }

        let mut shuffled = vec![ChildStats::default(); 5];
        for &i in &order {
            merge_child_stats(&mut shuffled, &as_stats[i]);
        }

        for (f, s) in forward.iter().zip(&shuffled) {
            prop_assert_eq!(f.visits, s.visits);
            prop_assert!((f.total_score - s.total_score).abs() < 1e-6);
        }
    }

    #[test]
    fn prop_merge_is_associative(
        a in prop::collection::vec((0u64..1000, -10.0f64..10.0), 4),
        b in prop::collection::vec((0u64..1000, -10.0f64..10.0), 4),
        c in prop::collection::vec((0u64..1000, -10.0f64..10.0), 4),
    ) {
        let to_stats = |v: &[(u64, f64)]| -> Vec<ChildStats> {
            v.iter()
                .map(|&(visits, total_score)| ChildStats { visits, total_score })
                .collect()
        };
        let (a, b, c) = (to_stats(&a), to_stats(&b), to_stats(&c));

        // (a + b) + c
        let mut left = vec![ChildStats::default(); 4];
        merge_child_stats(&mut left, &a);
        merge_child_stats(&mut left, &b);
        merge_child_stats(&mut left, &c);

        // a + (b + c)
        let mut bc = vec![ChildStats::default(); 4];
        merge_child_stats(&mut bc, &b);
        merge_child_stats(&mut bc, &c);
        let mut right = a.clone();
        merge_child_stats(&mut right, &bc);

        for (l, r) in left.iter().zip(&right) {
            prop_assert_eq!(l.visits, r.visits);
            prop_assert!((l.total_score - r.total_score).abs() < 1e-6);
        }
    }
}
