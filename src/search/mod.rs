//! Monte Carlo Tree Search over a single tree.
//!
//! Each [`SearchTree`] is an independent, single-threaded MCTS instance. The
//! scheduler in [`crate::scheduler`] fans several of them out across a
//! worker pool and merges their root statistics.

pub mod config;
pub mod node;
pub mod stats;
pub mod tree;

pub use config::SearchConfig;
pub use node::{NodeId, SearchNode};
pub use stats::SearchStats;
pub use tree::{ChildStats, SearchTree};
