//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected while running iterations on one tree.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Total iterations performed.
    pub iterations: u64,

    /// Nodes expanded (added to the tree).
    pub nodes_expanded: u64,

    /// Rollouts performed.
    pub simulations: u64,

    /// Iterations that ended on an already-terminal node (no rollout).
    pub terminal_hits: u64,

    /// Maximum depth reached during search.
    pub max_depth: u16,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fold another tree's statistics into this one.
    ///
    /// Used by the scheduler to aggregate across worker trees; `max_depth`
    /// takes the maximum, everything else sums.
    pub fn absorb(&mut self, other: &SearchStats) {
        self.iterations += other.iterations;
        self.nodes_expanded += other.nodes_expanded;
        self.simulations += other.simulations;
        self.terminal_hits += other.terminal_hits;
        self.max_depth = self.max_depth.max(other.max_depth);
        self.time_us += other.time_us;
    }

    /// Iterations per second over the measured time.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }
}
