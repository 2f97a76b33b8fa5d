//! Engine configuration.

use crate::event::Rounds;
use derive_getters::Getters;
use derive_more::{Display, Error};
use hawk_tictactoe::Difficulty;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Tunables for session expiry and console defaults.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct HawkConfig {
    /// Idle lifetime of a friend game or open invite, in seconds.
    #[serde(default = "default_invite_ttl_secs")]
    invite_ttl_secs: u64,

    /// Idle lifetime of a solo session or setup, in seconds.
    #[serde(default = "default_session_ttl_secs")]
    session_ttl_secs: u64,

    /// How often expired sessions are swept, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    sweep_interval_secs: u64,

    /// Difficulty preselected by the console.
    #[serde(default)]
    default_difficulty: Difficulty,

    /// Series length preselected by the console.
    #[serde(default)]
    default_rounds: Rounds,
}

fn default_invite_ttl_secs() -> u64 {
    60 * 60
}

fn default_session_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for HawkConfig {
    fn default() -> Self {
        Self {
            invite_ttl_secs: default_invite_ttl_secs(),
            session_ttl_secs: default_session_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            default_difficulty: Difficulty::default(),
            default_rounds: Rounds::default(),
        }
    }
}

impl HawkConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(?config, "Config loaded successfully");
        Ok(config)
    }

    /// Idle lifetime of friend games.
    pub fn invite_ttl(&self) -> Duration {
        Duration::from_secs(self.invite_ttl_secs)
    }

    /// Idle lifetime of solo sessions and setups.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Interval between sweeps. Never zero.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error at the caller's location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
