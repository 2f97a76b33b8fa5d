//! The game-session state machine.
//!
//! Solo: mode → symbol → difficulty → rounds → start → moves, with the
//! computer answering each accepted human move. Rounds repeat until the
//! series is complete.
//!
//! Friend: invite → two joins → alternating moves.
//!
//! Every operation is one fetch-mutate-store step against the owning store
//! and returns a [`Report`]; rejections leave the session unchanged.

use crate::config::HawkConfig;
use crate::error::GameError;
use crate::event::{CancelTarget, Event, Mode, Rounds};
use crate::report::{Prompt, Report, Series, Status, Winner};
use crate::session::{FriendSession, GameId, Joined, PlayerId, SoloSession, SoloSetup};
use crate::store::{Retain, SessionStore};
use hawk_tictactoe::ai::perfect_move;
use hawk_tictactoe::{Board, Difficulty, Mark, Outcome, Position, choose_move};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Shared handle to all sessions. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct GameEngine {
    setups: SessionStore<PlayerId, SoloSetup>,
    solo: SessionStore<PlayerId, SoloSession>,
    friends: SessionStore<GameId, FriendSession>,
    rng: Arc<Mutex<StdRng>>,
    invite_ttl: Duration,
    session_ttl: Duration,
}

impl GameEngine {
    /// Creates an engine with an entropy-seeded random source.
    #[instrument(skip(config))]
    pub fn new(config: &HawkConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates an engine whose easy and medium play is reproducible.
    #[instrument(skip(config))]
    pub fn with_seed(config: &HawkConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &HawkConfig, rng: StdRng) -> Self {
        info!(
            invite_ttl = ?config.invite_ttl(),
            session_ttl = ?config.session_ttl(),
            "Creating game engine"
        );
        Self {
            setups: SessionStore::new("solo-setup"),
            solo: SessionStore::new("solo"),
            friends: SessionStore::new("friend"),
            rng: Arc::new(Mutex::new(rng)),
            invite_ttl: config.invite_ttl(),
            session_ttl: config.session_ttl(),
        }
    }

    /// Routes one event from `actor` to its operation.
    #[instrument(skip(self))]
    pub fn handle(&self, actor: &str, event: Event) -> Report {
        match event {
            Event::SelectMode(mode) => self.select_mode(actor, mode),
            Event::SelectSymbol(mark) => self.select_symbol(actor, mark),
            Event::SelectDifficulty(difficulty) => self.select_difficulty(actor, difficulty),
            Event::SelectRounds(rounds) => self.select_rounds(actor, rounds),
            Event::StartGame => self.start_game(actor),
            Event::PlayerMove(index) => self.player_move(actor, index),
            Event::IssueInvite => self.issue_invite(actor),
            Event::AcceptInvite { game_id, mark } => self.accept_invite(&game_id, actor, mark),
            Event::FriendMove { game_id, index } => self.friend_move(&game_id, index, actor),
            Event::Cancel(target) => self.cancel(actor, target),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Solo setup
    // ─────────────────────────────────────────────────────────────

    /// Starts or restarts mode selection for `actor`.
    #[instrument(skip(self))]
    pub fn select_mode(&self, actor: &str, mode: Mode) -> Report {
        let setup = SoloSetup::for_mode(mode);
        let prompt = setup.next_prompt();
        self.setups.create(actor.to_string(), setup);
        info!(player_id = actor, %mode, "Mode selected");
        Report::empty(Status::AwaitingInput(prompt))
    }

    /// Chooses the human's mark; the computer takes the other.
    #[instrument(skip(self))]
    pub fn select_symbol(&self, actor: &str, mark: Mark) -> Report {
        self.configure(actor, |setup| setup.set_player_mark(mark))
    }

    /// Chooses the computer's strength.
    #[instrument(skip(self))]
    pub fn select_difficulty(&self, actor: &str, difficulty: Difficulty) -> Report {
        self.configure(actor, |setup| setup.set_difficulty(difficulty))
    }

    /// Chooses the series length.
    #[instrument(skip(self))]
    pub fn select_rounds(&self, actor: &str, rounds: Rounds) -> Report {
        self.configure(actor, |setup| setup.set_rounds(rounds))
    }

    fn configure(&self, actor: &str, write: impl FnOnce(&mut SoloSetup)) -> Report {
        let result = self.setups.update(&actor.to_string(), |setup| {
            if *setup.mode() != Some(Mode::Computer) {
                return (Err(GameError::WrongMode), Retain::Keep);
            }
            write(setup);
            (Ok(setup.next_prompt()), Retain::Keep)
        });

        match result {
            Ok(Ok(prompt)) => {
                debug!(player_id = actor, %prompt, "Setup updated");
                Report::empty(Status::AwaitingInput(prompt))
            }
            Ok(Err(err)) => Report::rejected(&Board::new(), err),
            Err(_) => Report::rejected(&Board::new(), GameError::SetupIncomplete(Prompt::Mode)),
        }
    }

    /// Creates a fresh solo series from the actor's completed setup.
    ///
    /// Overwrites any series the actor already had.
    #[instrument(skip(self))]
    pub fn start_game(&self, actor: &str) -> Report {
        let key = actor.to_string();
        let setup = match self.setups.get(&key) {
            Ok(setup) => setup,
            Err(_) => {
                return Report::rejected(&Board::new(), GameError::SetupIncomplete(Prompt::Mode));
            }
        };

        let session = match setup.into_session() {
            Ok(session) => session,
            Err(err) => {
                warn!(player_id = actor, %err, "Cannot start game");
                return Report::rejected(&Board::new(), err);
            }
        };

        let report = Report::on(session.board(), Status::InProgress)
            .with_score(session.scoreboard(Series::InProgress));
        self.solo.create(key.clone(), session);
        self.setups.remove(&key);
        info!(player_id = actor, "Solo game started");
        report
    }

    // ─────────────────────────────────────────────────────────────
    //  Solo play
    // ─────────────────────────────────────────────────────────────

    /// Applies the human's move, then the computer's reply.
    #[instrument(skip(self))]
    pub fn player_move(&self, actor: &str, index: usize) -> Report {
        let result = self
            .solo
            .update(&actor.to_string(), |session| self.play_solo_turn(session, index));

        result.unwrap_or_else(|err| {
            debug!(player_id = actor, "No solo game for move");
            Report::rejected(&Board::new(), err.into())
        })
    }

    fn play_solo_turn(&self, session: &mut SoloSession, index: usize) -> (Report, Retain) {
        let player_mark = *session.player_mark();
        if let Err(err) = session.board_mut().place(index, player_mark) {
            warn!(index, %err, "Rejected player move");
            let report = Report::rejected(session.board(), err.into())
                .with_score(session.scoreboard(Series::InProgress));
            return (report, Retain::Keep);
        }

        if let Some(outcome) = session.board().outcome() {
            return Self::finish_round(session, outcome, None);
        }

        let Some(reply) = self.computer_move(session) else {
            warn!("Computer found no cell to play");
            let report = Report::on(session.board(), Status::InProgress)
                .with_score(session.scoreboard(Series::InProgress));
            return (report, Retain::Keep);
        };

        match session.board().outcome() {
            Some(outcome) => Self::finish_round(session, outcome, Some(reply)),
            None => {
                let report = Report::on(session.board(), Status::InProgress)
                    .with_computer_move(Some(reply))
                    .with_score(session.scoreboard(Series::InProgress));
                (report, Retain::Keep)
            }
        }
    }

    /// Lets the AI choose and applies its cell to the session board.
    ///
    /// Returns `None` when the board has no empty cell. The shared rng is
    /// locked only for the tiers that draw from it.
    fn computer_move(&self, session: &mut SoloSession) -> Option<Position> {
        let computer = *session.computer_mark();
        let difficulty = *session.difficulty();
        let reply = match difficulty {
            Difficulty::Hard => perfect_move(session.board(), computer),
            Difficulty::Easy | Difficulty::Medium => {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                choose_move(session.board(), computer, difficulty, &mut *rng)
            }
        }?;

        if let Err(err) = session.board_mut().place_at(reply, computer) {
            warn!(%reply, %err, "Computer chose an unplayable cell");
            return None;
        }
        debug!(%reply, %difficulty, "Computer moved");
        Some(reply)
    }

    fn finish_round(
        session: &mut SoloSession,
        outcome: Outcome,
        computer_move: Option<Position>,
    ) -> (Report, Retain) {
        let status = match outcome {
            Outcome::Winner(mark) if mark == *session.player_mark() => Status::Win(Winner::Player),
            Outcome::Winner(_) => Status::Win(Winner::Computer),
            Outcome::Draw => Status::Draw,
        };
        info!(%outcome, round = *session.round(), "Round finished");

        let (finished, score) = session.complete_round(outcome);
        let retain = match score.series {
            Series::Complete => Retain::Remove,
            _ => Retain::Keep,
        };
        let report = Report::on(&finished, status)
            .with_computer_move(computer_move)
            .with_score(score);
        (report, retain)
    }

    // ─────────────────────────────────────────────────────────────
    //  Friend play
    // ─────────────────────────────────────────────────────────────

    /// Opens a friend game under a fresh invite code.
    #[instrument(skip(self))]
    pub fn issue_invite(&self, issuer: &str) -> Report {
        let game_id = uuid::Uuid::new_v4().to_string();
        self.friends
            .create(game_id.clone(), FriendSession::new(issuer.to_string()));
        info!(%game_id, issuer, "Invite issued");
        Report::empty(Status::AwaitingInput(Prompt::Join)).with_game_id(game_id)
    }

    /// Seats `actor` in the game with `mark`.
    #[instrument(skip(self))]
    pub fn accept_invite(&self, game_id: &str, actor: &str, mark: Mark) -> Report {
        let result = self.friends.update(&game_id.to_string(), |game| {
            let report = match game.join(actor, mark) {
                Ok(Joined::First) => {
                    Report::on(game.board(), Status::AwaitingInput(Prompt::Opponent))
                }
                Ok(Joined::Second) => Report::on(game.board(), Status::InProgress),
                Err(err) => Report::rejected(game.board(), err),
            };
            (report.with_turn(game.turn().clone()), Retain::Keep)
        });

        result
            .unwrap_or_else(|_| {
                warn!(game_id, "Invite expired or not found");
                Report::empty(Status::NotFound)
            })
            .with_game_id(game_id)
    }

    /// Applies a participant's move and passes the turn.
    #[instrument(skip(self))]
    pub fn friend_move(&self, game_id: &str, index: usize, actor: &str) -> Report {
        let result = self.friends.update(&game_id.to_string(), |game| {
            let mark = match game.check_turn(actor) {
                Ok(mark) => mark,
                Err(err) => {
                    warn!(player_id = actor, %err, "Rejected friend move");
                    let report = Report::rejected(game.board(), err).with_turn(game.turn().clone());
                    return (report, Retain::Keep);
                }
            };

            if let Err(err) = game.board_mut().place(index, mark) {
                warn!(player_id = actor, index, %err, "Rejected friend move");
                let report =
                    Report::rejected(game.board(), err.into()).with_turn(game.turn().clone());
                return (report, Retain::Keep);
            }

            match game.board().outcome() {
                Some(Outcome::Winner(mark)) => {
                    info!(player_id = actor, %mark, "Friend game won");
                    let winner = Winner::Participant {
                        id: actor.to_string(),
                        mark,
                    };
                    (Report::on(game.board(), Status::Win(winner)), Retain::Remove)
                }
                Some(Outcome::Draw) => {
                    info!("Friend game drawn");
                    (Report::on(game.board(), Status::Draw), Retain::Remove)
                }
                None => {
                    game.pass_turn(actor);
                    let report =
                        Report::on(game.board(), Status::InProgress).with_turn(game.turn().clone());
                    (report, Retain::Keep)
                }
            }
        });

        result
            .unwrap_or_else(|_| {
                warn!(game_id, "Friend game not found");
                Report::empty(Status::NotFound)
            })
            .with_game_id(game_id)
    }

    // ─────────────────────────────────────────────────────────────
    //  Teardown
    // ─────────────────────────────────────────────────────────────

    /// Abandons a solo series or a friend game.
    #[instrument(skip(self))]
    pub fn cancel(&self, actor: &str, target: CancelTarget) -> Report {
        match target {
            CancelTarget::Solo => {
                let key = actor.to_string();
                let setup = self.setups.remove(&key);
                match self.solo.remove(&key) {
                    Some(session) => {
                        info!(player_id = actor, "Solo series abandoned");
                        Report::on(session.board(), Status::Cancelled)
                            .with_score(session.scoreboard(Series::InProgress))
                    }
                    None if setup.is_some() => Report::empty(Status::Cancelled),
                    None => Report::empty(Status::NotFound),
                }
            }
            CancelTarget::Friend(game_id) => {
                let result = self.friends.update(&game_id, |game| {
                    if game.involves(actor) {
                        info!(player_id = actor, "Friend game cancelled");
                        (Report::on(game.board(), Status::Cancelled), Retain::Remove)
                    } else {
                        let report = Report::rejected(game.board(), GameError::NotParticipant);
                        (report, Retain::Keep)
                    }
                });
                result
                    .unwrap_or_else(|_| Report::empty(Status::NotFound))
                    .with_game_id(game_id)
            }
        }
    }

    /// Drops sessions idle past their configured lifetime.
    ///
    /// Returns the number of sessions removed.
    #[instrument(skip(self))]
    pub fn sweep_expired(&self) -> usize {
        self.sweep(self.session_ttl, self.invite_ttl)
    }

    /// Drops solo state idle for `session_ttl` and friend games idle for
    /// `invite_ttl`.
    pub fn sweep(&self, session_ttl: Duration, invite_ttl: Duration) -> usize {
        let removed = self.setups.sweep(session_ttl)
            + self.solo.sweep(session_ttl)
            + self.friends.sweep(invite_ttl);
        if removed > 0 {
            info!(removed, "Expired sessions swept");
        }
        removed
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// Snapshot of the actor's solo series.
    pub fn solo_session(&self, actor: &str) -> Option<SoloSession> {
        self.solo.get(&actor.to_string()).ok()
    }

    /// Snapshot of a friend game.
    pub fn friend_session(&self, game_id: &str) -> Option<FriendSession> {
        self.friends.get(&game_id.to_string()).ok()
    }

    /// Counts of live (setups, solo sessions, friend games).
    pub fn session_counts(&self) -> (usize, usize, usize) {
        (self.setups.len(), self.solo.len(), self.friends.len())
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(&HawkConfig::default())
    }
}
