//! Game rules for tic-tac-toe.
//!
//! Pure functions for evaluating board state. Rules are kept apart from
//! board storage so the AI search and the session engine share one
//! definition of a finished game.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner, is_winner};

use crate::types::{Board, Mark, Outcome};

impl Board {
    /// True iff `mark` occupies some complete row, column or diagonal.
    pub fn is_winner(&self, mark: Mark) -> bool {
        is_winner(self, mark)
    }

    /// Returns the mark holding a complete line, if any.
    pub fn winner(&self) -> Option<Mark> {
        check_winner(self)
    }

    /// True iff no empty cell remains.
    pub fn is_full(&self) -> bool {
        is_full(self)
    }

    /// Returns the outcome if the board is terminal.
    ///
    /// A completed line takes precedence over a full board.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.winner() {
            Some(mark) => Some(Outcome::Winner(mark)),
            None if self.is_full() => Some(Outcome::Draw),
            None => None,
        }
    }
}
