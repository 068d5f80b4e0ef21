//! Error taxonomy for the search core.
//!
//! Structural misuse (selecting from an empty child set, submitting to a
//! stopped pool) is surfaced immediately rather than papered over; a failing
//! game-engine call aborts the whole search attempt instead of continuing
//! with a corrupted tree. No retries happen anywhere in the core.

use thiserror::Error;

/// Errors produced by the search core.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// A job was submitted after `WorkerPool::shutdown` began.
    /// The job is rejected, never silently queued.
    #[error("worker pool is shut down; job rejected")]
    PoolShutdown,

    /// The game engine rejected a move during expansion or rollout.
    /// Fatal to the search attempt; the tree is discarded, not patched.
    #[error("game engine rejected move `{0}`")]
    IllegalMove(String),

    /// A best-child selection was attempted on a node with no children.
    /// This is a usage error, not a recoverable condition.
    #[error("cannot select a best child: node has no children")]
    EmptyChildSet,

    /// The root position has no legal moves, so there is no move to return.
    #[error("no legal moves available at the root position")]
    NoLegalMoves,
}
