//! Tic-tac-toe rules engine.
//!
//! Small two-player zero-sum perfect-information game used by the
//! integration tests, benches, and doc examples. `Side::First` plays X and
//! moves first.

use crate::core::SearchError;
use crate::game::{GameEngine, Outcome, Side};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A cell index on the 3x3 board, row-major from the top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell(pub u8);

impl Cell {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Immutable board snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Side>; 9],
    to_move: Side,
}

impl Board {
    /// The empty starting position, X to move.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            cells: [None; 9],
            to_move: Side::First,
        }
    }

    /// Build a position by playing out cell indices from the empty board,
    /// alternating sides.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::IllegalMove`] if a cell is occupied, out of
    /// range, or played after the game ended.
    pub fn from_moves(moves: &[usize]) -> Result<Self, SearchError> {
        let engine = TicTacToe;
        let mut board = Self::empty();
        for &idx in moves {
            if idx >= 9 {
                return Err(SearchError::IllegalMove(idx.to_string()));
            }
            board = engine.apply(&board, &Cell(idx as u8))?;
        }
        Ok(board)
    }

    /// Contents of a cell. `None` for an empty cell or an out-of-range
    /// index.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<Side> {
        self.cells.get(index).copied().flatten()
    }

    fn winner(&self) -> Option<Side> {
        for line in &LINES {
            if let Some(side) = self.cells[line[0]] {
                if self.cells[line[1]] == Some(side) && self.cells[line[2]] == Some(side) {
                    return Some(side);
                }
            }
        }
        None
    }

    fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

/// Tic-tac-toe rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct TicTacToe;

impl GameEngine for TicTacToe {
    type Position = Board;
    type Move = Cell;

    fn legal_moves(&self, position: &Board) -> Vec<Cell> {
        if position.winner().is_some() {
            return Vec::new();
        }
        position
            .cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| Cell(i as u8))
            .collect()
    }

    fn apply(&self, position: &Board, mv: &Cell) -> Result<Board, SearchError> {
        let idx = mv.index();
        if idx >= 9 || position.cells[idx].is_some() || position.winner().is_some() {
            return Err(SearchError::IllegalMove(self.move_to_text(mv)));
        }

        let mut next = position.clone();
        next.cells[idx] = Some(position.to_move);
        next.to_move = position.to_move.opponent();
        Ok(next)
    }

    fn is_terminal(&self, position: &Board) -> bool {
        position.winner().is_some() || position.is_full()
    }

    fn outcome(&self, position: &Board) -> Option<Outcome> {
        if let Some(side) = position.winner() {
            return Some(Outcome::Win(side));
        }
        if position.is_full() {
            return Some(Outcome::Draw);
        }
        None
    }

    fn side_to_move(&self, position: &Board) -> Side {
        position.to_move
    }

    fn move_to_text(&self, mv: &Cell) -> String {
        let col = (b'a' + mv.0 % 3) as char;
        let row = mv.0 / 3 + 1;
        format!("{col}{row}")
    }

    fn text_to_move(&self, position: &Board, text: &str) -> Option<Cell> {
        let bytes = text.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let col = bytes[0].checked_sub(b'a')?;
        let row = bytes[1].checked_sub(b'1')?;
        if col >= 3 || row >= 3 {
            return None;
        }
        let cell = Cell(row * 3 + col);
        if position.cells[cell.index()].is_none() && position.winner().is_none() {
            Some(cell)
        } else {
            None
        }
    }
}
