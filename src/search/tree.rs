//! Single-threaded MCTS tree.
//!
//! A `SearchTree` owns one root node and, transitively, the whole subtree in
//! a flat arena. `run(iterations)` performs the classic four phases per
//! iteration: UCB1 selection with negamax turn alternation, expansion of one
//! untried action, a uniformly-random rollout, and backpropagation along
//! parent links. Per-node visit/score totals are kept intact at every node;
//! they are what root parallelization merges afterwards.
//!
//! Exactly one thread ever mutates a given tree, so nothing in here locks.

use std::time::Instant;

use smallvec::SmallVec;

use crate::core::{SearchError, SearchRng};
use crate::game::GameEngine;

use super::config::SearchConfig;
use super::node::{NodeId, SearchNode};
use super::stats::SearchStats;

/// Merged per-child statistics, index-aligned with the root's children.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChildStats {
    /// Summed simulation count.
    pub visits: u64,
    /// Summed rollout outcomes.
    pub total_score: f64,
}

/// One independent MCTS tree.
pub struct SearchTree<E: GameEngine> {
    engine: E,
    config: SearchConfig,
    rng: SearchRng,
    nodes: Vec<SearchNode<E>>,
    root: NodeId,
    stats: SearchStats,
}

impl<E: GameEngine> SearchTree<E> {
    /// Create a tree rooted at the given position.
    pub fn new(engine: E, root_position: E::Position, config: SearchConfig) -> Self {
        let rng = SearchRng::new(config.seed);
        let root_node = Self::node_for_state(&engine, root_position, None, NodeId::NONE, 0);

        let mut nodes = Vec::with_capacity(1024);
        nodes.push(root_node);

        Self {
            engine,
            config,
            rng,
            nodes,
            root: NodeId::new(0),
            stats: SearchStats::default(),
        }
    }

    /// Eagerly expand the root's entire action set into direct children.
    ///
    /// Every parallel tree built from the same position flowers into the
    /// same child order, which is what makes index-aligned merging valid.
    /// Calling this twice is a no-op the second time.
    pub fn flower(&mut self) -> Result<(), SearchError> {
        while self.expand(self.root)?.is_some() {}
        Ok(())
    }

    /// Run exactly `iterations` MCTS iterations against the root.
    ///
    /// # Errors
    ///
    /// Propagates the first game-engine failure; the tree must then be
    /// discarded rather than merged.
    pub fn run(&mut self, iterations: u64) -> Result<(), SearchError> {
        let start = Instant::now();

        for _ in 0..iterations {
            self.iterate()?;
            self.stats.iterations += 1;
        }

        self.stats.time_us += start.elapsed().as_micros() as u64;
        Ok(())
    }

    /// One iteration: selection, expansion, rollout, backpropagation.
    fn iterate(&mut self) -> Result<(), SearchError> {
        let mut current = self.root;

        // Selection: descend through fully expanded interior nodes.
        loop {
            let node = &self.nodes[current.index()];
            if node.terminal || !node.untried.is_empty() || node.children.is_empty() {
                break;
            }
            current = self.select_child(current)?;
        }

        // A terminal node reached during selection skips expansion and
        // rollout; its known outcome backpropagates and the iteration still
        // counts against the budget.
        if self.nodes[current.index()].terminal {
            let score = self.nodes[current.index()].terminal_score;
            self.stats.terminal_hits += 1;
            self.backpropagate(current, score);
            return Ok(());
        }

        // Expansion: pop one untried action (last-inserted order).
        if let Some(child) = self.expand(current)? {
            current = child;
        }

        let score = self.rollout(current)?;
        self.backpropagate(current, score);
        Ok(())
    }

    /// UCB1 child selection with turn-sign alternation.
    ///
    /// An unvisited child is selected with absolute priority over any
    /// simulated sibling, so every child is sampled before any is
    /// re-sampled and no division by zero can occur.
    fn select_child(&self, parent: NodeId) -> Result<NodeId, SearchError> {
        let node = &self.nodes[parent.index()];
        if node.children.is_empty() {
            return Err(SearchError::EmptyChildSet);
        }

        let sign = node.side_to_move.sign();
        let ln_parent = (node.visits.max(1) as f64).ln();

        let mut best = node.children[0];
        let mut best_score = f64::NEG_INFINITY;

        for &child_id in &node.children {
            let child = &self.nodes[child_id.index()];
            let score = if child.visits == 0 {
                f64::INFINITY
            } else {
                sign * child.mean_score()
                    + self.config.exploration_constant
                        * (ln_parent / child.visits as f64).sqrt()
            };
            if score > best_score {
                best_score = score;
                best = child_id;
            }
        }

        Ok(best)
    }

    /// Expand one untried action of `parent` into a new child.
    ///
    /// Returns `Ok(None)` when the node is already fully expanded.
    fn expand(&mut self, parent: NodeId) -> Result<Option<NodeId>, SearchError> {
        let Some(mv) = self.nodes[parent.index()].untried.pop() else {
            return Ok(None);
        };

        let state = self.engine.apply(&self.nodes[parent.index()].state, &mv)?;
        let depth = self.nodes[parent.index()].depth + 1;
        let child = Self::node_for_state(&self.engine, state, Some(mv), parent, depth);

        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(child);
        self.nodes[parent.index()].children.push(id);

        self.stats.nodes_expanded += 1;
        if depth > self.stats.max_depth {
            self.stats.max_depth = depth;
        }

        Ok(Some(id))
    }

    /// Random playout from a node's state to a terminal position.
    fn rollout(&mut self, from: NodeId) -> Result<f64, SearchError> {
        self.stats.simulations += 1;
        let mut sim = self.nodes[from.index()].state.clone();

        loop {
            if self.engine.is_terminal(&sim) {
                return Ok(self.engine.outcome(&sim).map_or(0.0, |o| o.score()));
            }

            let moves = self.engine.legal_moves(&sim);
            let Some(mv) = self.rng.choose(&moves) else {
                // Non-terminal dead end: no legal moves, scored as a draw
                // unless the engine says otherwise.
                return Ok(self.engine.outcome(&sim).map_or(0.0, |o| o.score()));
            };

            sim = self.engine.apply(&sim, mv)?;
        }
    }

    /// Credit an outcome to a node and every ancestor up to the root.
    fn backpropagate(&mut self, mut id: NodeId, score: f64) {
        loop {
            let node = &mut self.nodes[id.index()];
            node.visits += 1;
            node.total_score += score;
            if node.parent.is_none() {
                break;
            }
            id = node.parent;
        }
    }

    fn node_for_state(
        engine: &E,
        state: E::Position,
        action: Option<E::Move>,
        parent: NodeId,
        depth: u16,
    ) -> SearchNode<E> {
        let terminal = engine.is_terminal(&state);
        let terminal_score = if terminal {
            engine.outcome(&state).map_or(0.0, |o| o.score())
        } else {
            0.0
        };
        let untried = if terminal {
            SmallVec::new()
        } else {
            SmallVec::from_vec(engine.legal_moves(&state))
        };
        let side_to_move = engine.side_to_move(&state);

        SearchNode {
            state,
            action,
            parent,
            children: SmallVec::new(),
            untried,
            visits: 0,
            total_score: 0.0,
            terminal,
            terminal_score,
            side_to_move,
            depth,
        }
    }

    // === Accessors ===

    /// The root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &SearchNode<E> {
        &self.nodes[id.index()]
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (it never is after construction).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Statistics collected so far.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Number of direct children of the root.
    #[must_use]
    pub fn root_child_count(&self) -> usize {
        self.node(self.root).children.len()
    }

    /// The move leading to the root child at `index`.
    #[must_use]
    pub fn root_child_action(&self, index: usize) -> Option<&E::Move> {
        let child_id = *self.node(self.root).children.get(index)?;
        self.node(child_id).action.as_ref()
    }

    /// Per-child visit/score totals, index-aligned with the root's children.
    #[must_use]
    pub fn root_child_stats(&self) -> Vec<ChildStats> {
        self.node(self.root)
            .children
            .iter()
            .map(|&id| {
                let child = self.node(id);
                ChildStats {
                    visits: child.visits,
                    total_score: child.total_score,
                }
            })
            .collect()
    }

    /// Add merged statistics back onto the root's children, index-aligned.
    ///
    /// # Panics
    ///
    /// Panics if `stats` does not match the root's child count; silently
    /// truncating a misaligned merge would corrupt the decision.
    pub fn add_root_child_stats(&mut self, stats: &[ChildStats]) {
        assert_eq!(
            stats.len(),
            self.root_child_count(),
            "child statistics must be index-aligned"
        );
        let children: Vec<NodeId> = self.node(self.root).children.iter().copied().collect();
        for (child_id, s) in children.into_iter().zip(stats) {
            let child = &mut self.nodes[child_id.index()];
            child.visits += s.visits;
            child.total_score += s.total_score;
        }
    }

    /// Index of the robust child: the root child with the most visits.
    ///
    /// Ties break toward the lowest index, deterministically.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyChildSet`] if the root has no children.
    pub fn best_root_child(&self) -> Result<usize, SearchError> {
        let root = self.node(self.root);
        if root.children.is_empty() {
            return Err(SearchError::EmptyChildSet);
        }

        let mut best = 0;
        let mut best_visits = self.node(root.children[0]).visits;
        for (i, &child_id) in root.children.iter().enumerate().skip(1) {
            let visits = self.node(child_id).visits;
            if visits > best_visits {
                best = i;
                best_visits = visits;
            }
        }
        Ok(best)
    }
}
