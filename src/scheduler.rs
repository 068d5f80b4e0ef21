//! Root parallelization: fan out independent trees, merge their statistics.
//!
//! The scheduler builds one flowered master tree plus P worker trees cloned
//! from the same root position. Each worker tree is handed to exactly one
//! pool job, so trees need no internal locking; the scheduler's only
//! synchronization points are job submission and one blocking `await_idle`.
//! After the barrier, per-child visit/score totals are summed index-by-index
//! into the master root (flowering guarantees matching child order) and the
//! robust child — the one with the most merged visits — wins. Visit count is
//! the single selection policy here: it is less sensitive to small-sample
//! variance than mean score.

use std::sync::{Arc, Mutex};

use crate::core::{derive_seed, SearchError};
use crate::game::GameEngine;
use crate::pool::WorkerPool;
use crate::search::{ChildStats, SearchConfig, SearchStats, SearchTree};

/// The merged result of one `evaluate` call.
#[derive(Clone, Debug)]
pub struct Decision<M> {
    /// Index of the winning root child.
    pub child_index: usize,
    /// The move that child represents.
    pub action: M,
    /// Merged visit count of the winning child.
    pub visits: u64,
    /// Merged score total of the winning child.
    pub total_score: f64,
    /// Statistics aggregated across all worker trees.
    pub stats: SearchStats,
}

/// Sum per-child statistics into an accumulator, index-aligned.
///
/// Plain addition per slot, so merging any number of trees in any order
/// yields the same totals.
///
/// # Panics
///
/// Panics on a length mismatch: index alignment is a hard requirement of
/// the merge, and truncating silently would mis-credit statistics.
pub fn merge_child_stats(into: &mut [ChildStats], from: &[ChildStats]) {
    assert_eq!(
        into.len(),
        from.len(),
        "child statistics must be index-aligned"
    );
    for (acc, s) in into.iter_mut().zip(from) {
        acc.visits += s.visits;
        acc.total_score += s.total_score;
    }
}

/// A finished worker tree plus the result of its `run`.
struct TreeSlot<E: GameEngine> {
    tree: SearchTree<E>,
    result: Result<(), SearchError>,
}

/// Root-parallel move selector.
pub struct Scheduler<E: GameEngine> {
    engine: E,
    config: SearchConfig,
}

impl<E: GameEngine> Scheduler<E> {
    /// Create a scheduler for the given engine and configuration.
    pub fn new(engine: E, config: SearchConfig) -> Self {
        Self { engine, config }
    }

    /// Select the best move for `root_position`.
    ///
    /// Runs `iterations_per_worker` MCTS iterations on each of
    /// `worker_count` independent trees, merges their root statistics, and
    /// returns the robust child.
    ///
    /// # Errors
    ///
    /// - [`SearchError::NoLegalMoves`] if the root has no legal moves.
    /// - [`SearchError::IllegalMove`] if the game engine fails during any
    ///   worker's search; no partial merge happens in that case.
    pub fn evaluate(
        &self,
        root_position: &E::Position,
        worker_count: usize,
        iterations_per_worker: u64,
    ) -> Result<Decision<E::Move>, SearchError> {
        if self.engine.legal_moves(root_position).is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let mut master = SearchTree::new(
            self.engine.clone(),
            root_position.clone(),
            self.config.clone(),
        );
        master.flower()?;

        // Forced move: nothing to search.
        if master.root_child_count() == 1 {
            log::debug!("single legal move at root, skipping search");
            let action = match master.root_child_action(0) {
                Some(mv) => mv.clone(),
                None => return Err(SearchError::EmptyChildSet),
            };
            return Ok(Decision {
                child_index: 0,
                action,
                visits: 0,
                total_score: 0.0,
                stats: SearchStats::default(),
            });
        }

        let worker_count = worker_count.max(1);
        log::debug!(
            "dispatching {} trees x {} iterations",
            worker_count,
            iterations_per_worker
        );

        // One independent tree per worker, each with its own derived seed.
        // Flowering from the same position produces identical child order
        // in every tree, which the index-aligned merge depends on.
        let mut slots = Vec::with_capacity(worker_count);
        for stream in 0..worker_count {
            let config = self
                .config
                .clone()
                .with_seed(derive_seed(self.config.seed, stream as u64 + 1));
            let mut tree =
                SearchTree::new(self.engine.clone(), root_position.clone(), config);
            tree.flower()?;
            slots.push(Arc::new(Mutex::new(TreeSlot {
                tree,
                result: Ok(()),
            })));
        }

        let mut pool = WorkerPool::new(worker_count);
        for slot in &slots {
            let slot = Arc::clone(slot);
            pool.submit(move || {
                let mut slot = slot.lock().unwrap_or_else(|e| e.into_inner());
                slot.result = slot.tree.run(iterations_per_worker);
            })?;
        }

        // Completion barrier: after this, every owning thread has finished,
        // so the trees are safe to read without further locking.
        pool.await_idle();
        pool.shutdown();

        let mut merged = vec![ChildStats::default(); master.root_child_count()];
        let mut stats = SearchStats::default();
        for slot in &slots {
            let slot = slot.lock().unwrap_or_else(|e| e.into_inner());
            slot.result.clone()?;
            merge_child_stats(&mut merged, &slot.tree.root_child_stats());
            stats.absorb(slot.tree.stats());
        }

        master.add_root_child_stats(&merged);
        let child_index = master.best_root_child()?;
        let action = match master.root_child_action(child_index) {
            Some(mv) => mv.clone(),
            None => return Err(SearchError::EmptyChildSet),
        };

        log::debug!(
            "merged {} trees: child {} wins with {} visits",
            slots.len(),
            child_index,
            merged[child_index].visits
        );

        Ok(Decision {
            child_index,
            action,
            visits: merged[child_index].visits,
            total_score: merged[child_index].total_score,
            stats,
        })
    }
}
