//! Error types for the session engine.

use crate::report::Prompt;
use crate::store::StoreError;
use derive_more::{Display, Error};
use hawk_tictactoe::{BoardError, Mark, Position};
use serde::Serialize;

/// Why an event was rejected.
///
/// Every variant is recoverable and local to one session; the engine
/// reports it and leaves the session as it was.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, Serialize)]
pub enum GameError {
    /// Cell index outside 0-8.
    #[display("Index {} is out of range (must be 0-8)", _0)]
    IndexOutOfRange(#[error(not(source))] usize),

    /// Cell already taken.
    #[display("Cell {} is already taken", _0)]
    CellOccupied(#[error(not(source))] Position),

    /// No game under the key, or the invite expired.
    #[display("Game not found")]
    GameNotFound,

    /// The actor has not joined this game.
    #[display("You are not part of this game")]
    NotParticipant,

    /// The other participant is to move.
    #[display("Not your turn")]
    NotYourTurn,

    /// Both seats are taken.
    #[display("Game is full")]
    GameFull,

    /// The first participant already plays this mark.
    #[display("{} is already taken by the other player", _0)]
    SymbolTaken(#[error(not(source))] Mark),

    /// The actor already holds a seat in this game.
    #[display("You already joined this game")]
    AlreadyJoined,

    /// Only one participant has joined so far.
    #[display("Waiting for an opponent to join")]
    AwaitingOpponent,

    /// A solo setup step is still missing.
    #[display("Setup incomplete: choose {} first", _0)]
    SetupIncomplete(#[error(not(source))] Prompt),

    /// The selection does not apply to the chosen mode.
    #[display("That choice does not apply to this game mode")]
    WrongMode,
}

impl From<BoardError> for GameError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::IndexOutOfRange(index) => Self::IndexOutOfRange(index),
            BoardError::CellOccupied(pos) => Self::CellOccupied(pos),
        }
    }
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::GameNotFound,
        }
    }
}

/// Input the console could not turn into an event.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseError {
    /// Round count outside {1, 3, 6}.
    #[display("Invalid round count '{}' (choose 1, 3 or 6)", _0)]
    InvalidRounds(#[error(not(source))] String),

    /// Not a cell number 1-9.
    #[display("Invalid cell '{}' (choose 1-9)", _0)]
    InvalidCell(#[error(not(source))] String),
}
