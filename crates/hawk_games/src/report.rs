//! Outbound result descriptors handed back to the transport layer.

use crate::error::GameError;
use crate::session::PlayerId;
use hawk_tictactoe::{Board, Cell, Mark, Position};
use serde::Serialize;

/// The input the engine expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Prompt {
    /// Choose computer or friend mode.
    Mode,
    /// Choose X or O.
    Symbol,
    /// Choose easy, medium or hard.
    Difficulty,
    /// Choose 1, 3 or 6 rounds.
    Rounds,
    /// Setup is complete; start the game.
    Start,
    /// Issue an invite for a friend game.
    Invite,
    /// The invite is open; any player may join.
    Join,
    /// One player joined; waiting for the second.
    Opponent,
}

/// Who won a finished board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Winner {
    /// The solo human.
    Player,
    /// The computer.
    Computer,
    /// A friend-mode participant.
    Participant {
        /// Participant identity.
        id: PlayerId,
        /// Mark they played.
        mark: Mark,
    },
}

/// Status of the session after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Status {
    /// Configuration or matchmaking is waiting on the user.
    AwaitingInput(Prompt),
    /// A game is running and waiting for a move.
    InProgress,
    /// The board was won.
    Win(Winner),
    /// The board filled with no winner.
    Draw,
    /// The event was refused; nothing changed.
    Rejected(GameError),
    /// No session answers to the event's key.
    NotFound,
    /// The session was abandoned on request.
    Cancelled,
}

/// Progress of a solo round series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Series {
    /// The current round is still being played.
    InProgress,
    /// The round ended and a fresh board is ready for the next one.
    Continues,
    /// The final round ended; the session is gone.
    Complete,
}

/// Solo scores for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    /// Round the reported board belongs to (1-based).
    pub round: u8,
    /// Rounds requested for the series.
    pub rounds: u8,
    /// Rounds won by the human.
    pub player: u8,
    /// Rounds won by the computer.
    pub computer: u8,
    /// Drawn rounds.
    pub draws: u8,
    /// Series progress.
    pub series: Series,
}

/// Everything the transport needs to render one event's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_new::new)]
pub struct Report {
    /// Board snapshot. For a finished round this is the finished board.
    pub board: [Cell; 9],
    /// Session status.
    pub status: Status,
    /// Friend game the report belongs to.
    #[new(default)]
    pub game_id: Option<String>,
    /// Friend participant to move next.
    #[new(default)]
    pub turn: Option<PlayerId>,
    /// Cell the computer answered with.
    #[new(default)]
    pub computer_move: Option<Position>,
    /// Solo scores.
    #[new(default)]
    pub score: Option<Scoreboard>,
}

impl Report {
    /// Report with a board snapshot.
    pub fn on(board: &Board, status: Status) -> Self {
        Self::new(*board.cells(), status)
    }

    /// Report for a request that had no board to show.
    pub fn empty(status: Status) -> Self {
        Self::on(&Board::new(), status)
    }

    /// Rejection report. `GameNotFound` is reported as [`Status::NotFound`].
    pub fn rejected(board: &Board, err: GameError) -> Self {
        let status = match err {
            GameError::GameNotFound => Status::NotFound,
            other => Status::Rejected(other),
        };
        Self::on(board, status)
    }

    /// Attaches the friend game id.
    pub fn with_game_id(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = Some(game_id.into());
        self
    }

    /// Attaches the participant to move next.
    pub fn with_turn(mut self, turn: Option<PlayerId>) -> Self {
        self.turn = turn;
        self
    }

    /// Attaches the computer's reply.
    pub fn with_computer_move(mut self, pos: Option<Position>) -> Self {
        self.computer_move = pos;
        self
    }

    /// Attaches solo scores.
    pub fn with_score(mut self, score: Scoreboard) -> Self {
        self.score = Some(score);
        self
    }

    /// True for wins and draws.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, Status::Win(_) | Status::Draw)
    }
}
