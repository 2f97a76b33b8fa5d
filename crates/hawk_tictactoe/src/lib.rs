//! Pure tic-tac-toe logic for Game Hawk.
//!
//! - **Board**: the 3x3 grid value and its placement contract
//! - **Rules**: win and draw detection over the 8 fixed lines
//! - **AI**: computer opponents at three difficulty tiers
//!
//! Nothing here knows about players, sessions or transports.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod ai;
mod error;
mod position;
pub mod rules;
mod types;

pub use ai::{Difficulty, choose_move};
pub use error::BoardError;
pub use position::Position;
pub use types::{Board, Cell, Mark, Outcome};
