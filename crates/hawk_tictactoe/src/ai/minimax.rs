//! Exhaustive minimax over the remaining game tree.

use crate::position::Position;
use crate::types::{Board, Mark};
use tracing::instrument;

/// Score of a board the computer has won.
pub const WIN_SCORE: i32 = 10;
/// Score of a board the opponent has won.
pub const LOSS_SCORE: i32 = -10;
/// Score of a drawn board.
pub const DRAW_SCORE: i32 = 0;

/// Result of a minimax search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimaxResult {
    /// Value of the board from the computer's point of view.
    pub score: i32,

    /// The best cell for the side to move, `None` if the board is terminal.
    pub best_move: Option<Position>,
}

/// Searches every continuation of `board` with `to_move` to play.
///
/// The computer maximizes and the opponent minimizes. Scores carry no
/// depth discount. Among equally scored children the first one in
/// ascending cell order is kept.
pub fn minimax(board: &Board, to_move: Mark, computer: Mark) -> MinimaxResult {
    let opponent = computer.opponent();

    // Terminal checks run opponent first, then computer, then full board.
    if board.is_winner(opponent) {
        return MinimaxResult { score: LOSS_SCORE, best_move: None };
    }
    if board.is_winner(computer) {
        return MinimaxResult { score: WIN_SCORE, best_move: None };
    }

    let maximizing = to_move == computer;
    let mut best: Option<(i32, Position)> = None;

    for pos in board.available_cells() {
        let child = board.with_mark(pos, to_move);
        let score = minimax(&child, to_move.opponent(), computer).score;

        let better = match best {
            None => true,
            Some((best_score, _)) if maximizing => score > best_score,
            Some((best_score, _)) => score < best_score,
        };
        if better {
            best = Some((score, pos));
        }
    }

    match best {
        Some((score, pos)) => MinimaxResult { score, best_move: Some(pos) },
        None => MinimaxResult { score: DRAW_SCORE, best_move: None },
    }
}

/// Hard-tier choice: the computer's optimal cell.
#[instrument(skip(board))]
pub fn perfect_move(board: &Board, computer: Mark) -> Option<Position> {
    minimax(board, computer, computer).best_move
}
