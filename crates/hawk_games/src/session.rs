//! Session state for solo series and friend games.

use crate::error::GameError;
use crate::event::{Mode, Rounds};
use crate::report::{Prompt, Scoreboard, Series};
use derive_getters::Getters;
use hawk_tictactoe::{Board, Difficulty, Mark, Outcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a player.
pub type PlayerId = String;

/// Unique identifier for a friend game (the invite code).
pub type GameId = String;

/// Solo configuration gathered before the first board exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SoloSetup {
    mode: Option<Mode>,
    player_mark: Option<Mark>,
    difficulty: Option<Difficulty>,
    rounds: Option<Rounds>,
}

impl SoloSetup {
    /// Starts a setup for the chosen mode.
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    /// Records the human's mark.
    pub fn set_player_mark(&mut self, mark: Mark) {
        self.player_mark = Some(mark);
    }

    /// Records the difficulty.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = Some(difficulty);
    }

    /// Records the series length.
    pub fn set_rounds(&mut self, rounds: Rounds) {
        self.rounds = Some(rounds);
    }

    /// The next missing selection, or [`Prompt::Start`] once complete.
    pub fn next_prompt(&self) -> Prompt {
        match self {
            Self { mode: None, .. } => Prompt::Mode,
            Self { mode: Some(Mode::Friend), .. } => Prompt::Invite,
            Self { player_mark: None, .. } => Prompt::Symbol,
            Self { difficulty: None, .. } => Prompt::Difficulty,
            Self { rounds: None, .. } => Prompt::Rounds,
            _ => Prompt::Start,
        }
    }

    /// Builds a fresh session from a complete computer-mode setup.
    pub fn into_session(self) -> Result<SoloSession, GameError> {
        match self {
            Self {
                mode: Some(Mode::Computer),
                player_mark: Some(mark),
                difficulty: Some(difficulty),
                rounds: Some(rounds),
            } => Ok(SoloSession::new(mark, difficulty, rounds)),
            Self { mode: Some(Mode::Friend), .. } => Err(GameError::WrongMode),
            incomplete => Err(GameError::SetupIncomplete(incomplete.next_prompt())),
        }
    }
}

/// A solo series against the computer.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SoloSession {
    board: Board,
    difficulty: Difficulty,
    player_mark: Mark,
    computer_mark: Mark,
    rounds: Rounds,
    /// Current round (1-based).
    round: u8,
    player_score: u8,
    computer_score: u8,
    draws: u8,
}

impl SoloSession {
    /// Creates a series at round 1 with an empty board and zero scores.
    #[instrument]
    pub fn new(player_mark: Mark, difficulty: Difficulty, rounds: Rounds) -> Self {
        info!("Creating solo session");
        Self {
            board: Board::new(),
            difficulty,
            player_mark,
            computer_mark: player_mark.opponent(),
            rounds,
            round: 1,
            player_score: 0,
            computer_score: 0,
            draws: 0,
        }
    }

    /// Mutable access to the board for move application.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Current scores, labelled with the given series progress.
    pub fn scoreboard(&self, series: Series) -> Scoreboard {
        Scoreboard {
            round: self.round,
            rounds: self.rounds.count(),
            player: self.player_score,
            computer: self.computer_score,
            draws: self.draws,
            series,
        }
    }

    /// Scores a finished round and advances the series.
    ///
    /// Returns the finished board and the scoreboard for the finished round.
    /// When rounds remain the board is reset for the next one.
    #[instrument(skip(self), fields(round = self.round))]
    pub fn complete_round(&mut self, outcome: Outcome) -> (Board, Scoreboard) {
        match outcome {
            Outcome::Winner(mark) if mark == self.player_mark => self.player_score += 1,
            Outcome::Winner(_) => self.computer_score += 1,
            Outcome::Draw => self.draws += 1,
        }

        let finished = self.board;
        let series = if self.round < self.rounds.count() {
            Series::Continues
        } else {
            Series::Complete
        };
        let score = self.scoreboard(series);

        self.round += 1;
        if series == Series::Continues {
            self.board = Board::new();
            debug!(next_round = self.round, "Board reset for next round");
        } else {
            info!(
                player = self.player_score,
                computer = self.computer_score,
                draws = self.draws,
                "Series complete"
            );
        }
        (finished, score)
    }
}

/// A seated friend-mode player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Player's unique ID.
    pub id: PlayerId,
    /// Mark this player uses.
    pub mark: Mark,
}

/// Result of a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joined {
    /// First seat taken; waiting for an opponent.
    First,
    /// Second seat taken; the game starts.
    Second,
}

/// A game between two remote players, keyed by invite code.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct FriendSession {
    board: Board,
    /// Who opened the invite.
    issuer: PlayerId,
    /// Seated players in join order (at most two).
    participants: Vec<Participant>,
    /// Player to move; the first joiner until they move.
    turn: Option<PlayerId>,
}

impl FriendSession {
    /// Opens an invite with no seated players.
    #[instrument]
    pub fn new(issuer: PlayerId) -> Self {
        info!("Opening friend game");
        Self {
            board: Board::new(),
            issuer,
            participants: Vec::with_capacity(2),
            turn: None,
        }
    }

    /// Mutable access to the board for move application.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Gets the participant with the given ID.
    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// True once both seats are taken.
    pub fn is_full(&self) -> bool {
        self.participants.len() == 2
    }

    /// Seats `actor` with `mark`.
    ///
    /// The first joiner moves first. The second must choose the other mark.
    #[instrument(skip(self), fields(seated = self.participants.len()))]
    pub fn join(&mut self, actor: &str, mark: Mark) -> Result<Joined, GameError> {
        let joined = match self.participants.as_slice() {
            [] => Joined::First,
            [first] if first.id == actor => {
                warn!(player_id = actor, "Player tried to join twice");
                return Err(GameError::AlreadyJoined);
            }
            [first] if first.mark == mark => {
                warn!(player_id = actor, %mark, "Mark already taken");
                return Err(GameError::SymbolTaken(mark));
            }
            [_] => Joined::Second,
            _ => {
                warn!(player_id = actor, "Game already has 2 players");
                return Err(GameError::GameFull);
            }
        };

        self.participants.push(Participant {
            id: actor.to_string(),
            mark,
        });
        if joined == Joined::First {
            self.turn = Some(actor.to_string());
        }
        info!(player_id = actor, %mark, ?joined, "Player joined");
        Ok(joined)
    }

    /// Checks that `actor` may move now and returns their mark.
    pub fn check_turn(&self, actor: &str) -> Result<Mark, GameError> {
        let participant = self.participant(actor).ok_or(GameError::NotParticipant)?;
        if !self.is_full() {
            return Err(GameError::AwaitingOpponent);
        }
        if self.turn.as_deref() != Some(actor) {
            return Err(GameError::NotYourTurn);
        }
        Ok(participant.mark)
    }

    /// Hands the turn to the participant who is not `actor`.
    pub fn pass_turn(&mut self, actor: &str) {
        if let Some(other) = self.participants.iter().find(|p| p.id != actor) {
            self.turn = Some(other.id.clone());
        }
    }

    /// True if `actor` issued or joined this game.
    pub fn involves(&self, actor: &str) -> bool {
        self.issuer == actor || self.participant(actor).is_some()
    }
}
