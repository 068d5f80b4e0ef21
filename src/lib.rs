//! # root-mcts
//!
//! Root-parallel Monte Carlo Tree Search for two-player zero-sum
//! perfect-information games.
//!
//! ## Design Principles
//!
//! 1. **Independent trees, merged after the fact**: each worker thread owns
//!    one whole tree. No shared nodes, no fine-grained locking; the only
//!    synchronization is job submission and one completion barrier.
//!
//! 2. **Rules stay external**: the crate never implements game logic. A
//!    caller supplies a [`GameEngine`]; a tic-tac-toe demo under
//!    [`games`] covers tests and examples.
//!
//! 3. **Deterministic by construction**: every rollout draws from an
//!    explicitly seeded, forkable RNG. The same base seed reproduces the
//!    same parallel search.
//!
//! ## Architecture
//!
//! - [`SearchTree`] runs plain single-threaded MCTS: UCB1 selection with
//!   negamax turn alternation, one expansion per iteration, uniform random
//!   rollouts, backpropagation of visit/score totals.
//! - [`WorkerPool`] is a generic fixed-size FIFO job pool, independent of
//!   the search.
//! - [`Scheduler`] flowers a master root, clones P index-aligned trees,
//!   fans them out across the pool, waits for all of them, merges per-child
//!   visit/score totals, and picks the robust child (most merged visits).
//!
//! ## Usage
//!
//! ```
//! use root_mcts::games::tictactoe::{Board, TicTacToe};
//! use root_mcts::{Scheduler, SearchConfig};
//!
//! let scheduler = Scheduler::new(TicTacToe, SearchConfig::default());
//! let decision = scheduler.evaluate(&Board::empty(), 2, 200).unwrap();
//! assert!(decision.child_index < 9);
//! ```
//!
//! ## Modules
//!
//! - `core`: error taxonomy and deterministic RNG
//! - `game`: the `GameEngine` trait, sides, outcomes
//! - `search`: per-tree MCTS (nodes, tree, config, stats)
//! - `pool`: worker-job thread pool
//! - `scheduler`: root parallelization and merge
//! - `games`: built-in demo games for tests and examples

pub mod core;
pub mod game;
pub mod games;
pub mod pool;
pub mod scheduler;
pub mod search;

// Re-export commonly used types
pub use crate::core::{derive_seed, SearchError, SearchRng};
pub use crate::game::{GameEngine, Outcome, Side};
pub use crate::pool::WorkerPool;
pub use crate::scheduler::{merge_child_stats, Decision, Scheduler};
pub use crate::search::{ChildStats, NodeId, SearchConfig, SearchNode, SearchStats, SearchTree};
