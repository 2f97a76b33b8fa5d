//! Inbound events delivered by the transport layer.

use crate::error::ParseError;
use crate::session::GameId;
use hawk_tictactoe::{Difficulty, Mark};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the user wants to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    /// Solo against the computer.
    Computer,
    /// Against a friend through an invite.
    Friend,
}

/// Permitted lengths of a solo round series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rounds {
    /// A single round.
    #[default]
    One,
    /// Best of three.
    Three,
    /// Six rounds.
    Six,
}

impl Rounds {
    /// Number of rounds in the series.
    pub fn count(self) -> u8 {
        match self {
            Rounds::One => 1,
            Rounds::Three => 3,
            Rounds::Six => 6,
        }
    }
}

impl TryFrom<u8> for Rounds {
    type Error = ParseError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Rounds::One),
            3 => Ok(Rounds::Three),
            6 => Ok(Rounds::Six),
            other => Err(ParseError::InvalidRounds(other.to_string())),
        }
    }
}

impl From<Rounds> for u8 {
    fn from(rounds: Rounds) -> Self {
        rounds.count()
    }
}

impl FromStr for Rounds {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidRounds(s.to_string()))
            .and_then(Rounds::try_from)
    }
}

impl std::fmt::Display for Rounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.count())
    }
}

/// What a `Cancel` event abandons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelTarget {
    /// The actor's solo setup and series.
    Solo,
    /// A friend game the actor issued or joined.
    Friend(GameId),
}

/// One user action, as delivered by the transport.
///
/// The acting identity travels alongside the event, not inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Starts (or restarts) mode selection.
    SelectMode(Mode),
    /// Chooses the human's mark for a solo game.
    SelectSymbol(Mark),
    /// Chooses the computer's strength.
    SelectDifficulty(Difficulty),
    /// Chooses the series length.
    SelectRounds(Rounds),
    /// Starts the configured solo series.
    StartGame,
    /// Solo move at a cell index (0-8).
    PlayerMove(usize),
    /// Opens a new friend game.
    IssueInvite,
    /// Joins a friend game with a mark.
    AcceptInvite {
        /// Invite to join.
        game_id: GameId,
        /// Mark to play.
        mark: Mark,
    },
    /// Friend-mode move at a cell index (0-8).
    FriendMove {
        /// Game to move in.
        game_id: GameId,
        /// Cell index (0-8).
        index: usize,
    },
    /// Abandons a solo series or a friend game.
    Cancel(CancelTarget),
}
