//! One-ply heuristic: win, else block, else random.

use crate::position::Position;
use crate::types::{Board, Mark};
use rand::Rng;
use tracing::trace;

/// First empty cell (ascending index) that completes a line for `mark`.
pub fn winning_move(board: &Board, mark: Mark) -> Option<Position> {
    board
        .available_cells()
        .into_iter()
        .find(|&pos| board.with_mark(pos, mark).is_winner(mark))
}

/// First empty cell that stops `computer`'s opponent from winning next turn.
pub fn blocking_move(board: &Board, computer: Mark) -> Option<Position> {
    winning_move(board, computer.opponent())
}

/// Medium-tier choice.
///
/// Every winning cell is considered before any blocking cell, so an
/// available win is always taken over a block.
pub fn heuristic_move<R: Rng + ?Sized>(
    board: &Board,
    computer: Mark,
    rng: &mut R,
) -> Option<Position> {
    if let Some(pos) = winning_move(board, computer) {
        trace!(?pos, "Taking the win");
        return Some(pos);
    }
    if let Some(pos) = blocking_move(board, computer) {
        trace!(?pos, "Blocking the opponent");
        return Some(pos);
    }
    super::random_move(board, rng)
}
