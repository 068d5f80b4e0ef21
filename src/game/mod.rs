//! Game engine trait: the rules collaborator consumed by the search.
//!
//! The search core never implements game rules itself. A caller provides a
//! [`GameEngine`] that knows how to enumerate legal moves, apply a move to an
//! immutable position value, detect terminal states, and score them. The
//! engine must be deterministic: the same position always yields the same
//! legal-move sequence, in the same order. Parallel trees rely on that
//! ordering to keep their root children index-aligned.

use crate::core::SearchError;

/// One of the two players.
///
/// Outcomes are scored from a fixed perspective: a win for [`Side::First`]
/// is `+1.0`, a win for [`Side::Second`] is `-1.0`. `First` therefore
/// maximizes during selection and `Second` minimizes (negamax alternation).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The maximizing side (+1 on a win).
    First,
    /// The minimizing side (-1 on a win).
    Second,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Sign of this side's optimization direction in UCB1 exploitation.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Side::First => 1.0,
            Side::Second => -1.0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::First => write!(f, "first"),
            Side::Second => write!(f, "second"),
        }
    }
}

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The given side won.
    Win(Side),
    /// Draw: stalemate, repetition, insufficient material, and so on.
    Draw,
}

impl Outcome {
    /// Fixed-perspective scalar used as the rollout sample.
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Outcome::Win(side) => side.sign(),
            Outcome::Draw => 0.0,
        }
    }
}

/// The rules engine consumed by the search core.
///
/// ## Implementation notes
///
/// - `legal_moves` must be deterministic, including order.
/// - `apply` must not mutate the input; it produces a fresh position.
/// - `outcome` is only meaningful once `is_terminal` returns true.
/// - `move_to_text` / `text_to_move` exist for display and input parsing
///   only; the search never calls them.
///
/// The `Clone + Send + Sync` bounds let the scheduler hand an engine copy to
/// each worker tree.
pub trait GameEngine: Clone + Send + Sync + 'static {
    /// Immutable game-state value.
    type Position: Clone + Send + 'static;

    /// A move applicable to a position.
    type Move: Clone + PartialEq + Send + 'static;

    /// Enumerate legal moves. An empty result signals no legal moves.
    fn legal_moves(&self, position: &Self::Position) -> Vec<Self::Move>;

    /// Apply a legal move, producing a new position.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::IllegalMove`] if the move is not legal in the
    /// position.
    fn apply(
        &self,
        position: &Self::Position,
        mv: &Self::Move,
    ) -> Result<Self::Position, SearchError>;

    /// Is the game over at this position?
    fn is_terminal(&self, position: &Self::Position) -> bool;

    /// Outcome of a terminal position. `None` while the game continues.
    fn outcome(&self, position: &Self::Position) -> Option<Outcome>;

    /// Whose turn it is at this position.
    fn side_to_move(&self, position: &Self::Position) -> Side;

    /// Human-readable notation for a move (display only).
    fn move_to_text(&self, mv: &Self::Move) -> String;

    /// Parse notation into a move legal in the given position.
    fn text_to_move(&self, position: &Self::Position, text: &str) -> Option<Self::Move>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::First.opponent(), Side::Second);
        assert_eq!(Side::Second.opponent(), Side::First);
    }

    #[test]
    fn test_side_sign() {
        assert_eq!(Side::First.sign(), 1.0);
        assert_eq!(Side::Second.sign(), -1.0);
    }

    #[test]
    fn test_outcome_score() {
        assert_eq!(Outcome::Win(Side::First).score(), 1.0);
        assert_eq!(Outcome::Win(Side::Second).score(), -1.0);
        assert_eq!(Outcome::Draw.score(), 0.0);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::First.to_string(), "first");
        assert_eq!(Side::Second.to_string(), "second");
    }
}
