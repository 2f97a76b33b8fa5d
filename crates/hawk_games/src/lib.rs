//! Game Hawk session engine.
//!
//! Runs tic-tac-toe sessions for a chat-bot front end: solo series against
//! the computer and invite-based games between two players.
//!
//! # Architecture
//!
//! - **Store**: keyed, per-key locked registry that owns every session
//! - **Engine**: the session state machine; one [`Event`] in, one [`Report`] out
//! - **Console**: a line-oriented stand-in for the chat transport
//!
//! # Example
//!
//! ```
//! use hawk_games::{Event, GameEngine, HawkConfig, Mode, Rounds, Status};
//! use hawk_tictactoe::{Difficulty, Mark};
//!
//! let engine = GameEngine::with_seed(&HawkConfig::default(), 7);
//! engine.handle("alice", Event::SelectMode(Mode::Computer));
//! engine.handle("alice", Event::SelectSymbol(Mark::X));
//! engine.handle("alice", Event::SelectDifficulty(Difficulty::Hard));
//! engine.handle("alice", Event::SelectRounds(Rounds::One));
//! engine.handle("alice", Event::StartGame);
//!
//! let report = engine.handle("alice", Event::PlayerMove(4));
//! assert_eq!(report.status, Status::InProgress);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
pub mod console;
mod engine;
mod error;
mod event;
mod report;
mod session;
mod store;

pub use config::{ConfigError, HawkConfig};
pub use engine::GameEngine;
pub use error::{GameError, ParseError};
pub use event::{CancelTarget, Event, Mode, Rounds};
pub use report::{Prompt, Report, Scoreboard, Series, Status, Winner};
pub use session::{FriendSession, GameId, Participant, PlayerId, SoloSession, SoloSetup};
pub use store::{Retain, SessionStore, StoreError};
