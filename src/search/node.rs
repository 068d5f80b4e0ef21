//! Search node and arena index.
//!
//! Nodes live in a flat arena owned by the tree and reference each other by
//! `NodeId` index. The parent link is a plain index used only for the
//! backpropagation walk; ownership flows strictly downward (the arena owns
//! every node, a node logically owns its children), so there are no
//! reference cycles and nothing to free through the back-reference.

use smallvec::SmallVec;

use crate::game::{GameEngine, Side};

/// Index into the tree's node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// One node of a single search tree.
///
/// Exactly one thread ever mutates a node: the tree it belongs to is handed
/// to one worker job, so no locking lives here.
#[derive(Clone)]
pub struct SearchNode<E: GameEngine> {
    /// Game position snapshot. Immutable once stored.
    pub state: E::Position,

    /// Move that produced this node from its parent. `None` for the root.
    pub action: Option<E::Move>,

    /// Non-owning back-reference, used only by backpropagation.
    pub parent: NodeId,

    /// Owned children, in insertion order. Cloned trees of the same root
    /// expand in the same order, so child indices align across trees.
    pub children: SmallVec<[NodeId; 8]>,

    /// Legal moves not yet expanded into children. Strictly shrinks.
    pub untried: SmallVec<[E::Move; 8]>,

    /// Simulation count.
    pub visits: u64,

    /// Running sum of rollout outcomes credited to this node.
    /// Kept as a sum, never an average: root-parallel merging needs totals.
    pub total_score: f64,

    /// Terminal flag, computed once at construction.
    pub terminal: bool,

    /// Cached outcome score for terminal nodes; 0.0 otherwise.
    pub terminal_score: f64,

    /// Whose turn it is at this node (decides the UCB1 sign).
    pub side_to_move: Side,

    /// Depth in the tree (root = 0).
    pub depth: u16,
}

impl<E: GameEngine> SearchNode<E> {
    /// True when nothing remains to expand under this node.
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.terminal || self.untried.is_empty()
    }

    /// True for the tree's root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Average rollout outcome seen through this node.
    #[must_use]
    pub fn mean_score(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_score / self.visits as f64
        }
    }
}
