//! Computer opponents.
//!
//! Every tier is a pure function of the board, the computer's mark and a
//! caller-supplied random source. None of them mutate the board they are
//! given. Calling any of them on a board with no empty cell yields `None`.

mod heuristic;
mod minimax;

pub use heuristic::{blocking_move, heuristic_move, winning_move};
pub use minimax::{MinimaxResult, minimax, perfect_move};

use crate::position::Position;
use crate::types::{Board, Mark};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Strength of the computer opponent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniformly random empty cell.
    Easy,
    /// Win if possible, otherwise block, otherwise random.
    #[default]
    Medium,
    /// Exhaustive minimax; never loses.
    Hard,
}

/// Picks the computer's next cell at the given difficulty.
///
/// `computer` is the mark the computer plays; the opponent plays
/// `computer.opponent()`.
#[instrument(skip(board, rng), fields(free = board.available_cells().len()))]
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    computer: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Position> {
    let chosen = match difficulty {
        Difficulty::Easy => random_move(board, rng),
        Difficulty::Medium => heuristic_move(board, computer, rng),
        Difficulty::Hard => perfect_move(board, computer),
    };
    debug!(?chosen, "Computer chose a cell");
    chosen
}

/// Uniformly random empty cell.
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    board.available_cells().choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_move_only_picks_empty_cells() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::new();
        for i in [0, 2, 4, 6, 8] {
            board.place(i, Mark::X).unwrap();
        }
        for _ in 0..50 {
            let pos = random_move(&board, &mut rng).unwrap();
            assert!(board.is_empty(pos));
        }
    }

    #[test]
    fn test_full_board_has_no_move() {
        let mut board = Board::new();
        for i in 0..9 {
            board.place(i, if i % 2 == 0 { Mark::X } else { Mark::O }).unwrap();
        }
        let mut rng = StdRng::seed_from_u64(1);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(choose_move(&board, Mark::O, difficulty, &mut rng), None);
        }
    }

    #[test]
    fn test_difficulty_parses_any_case() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }
}
