//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// How a candidate split is scored against pairing history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyMode {
    /// Teammate repeats plus all four cross-team opponent repeats.
    #[default]
    Full,
    /// Teammate repeats only.
    TeammatesOnly,
}

/// How much pairing history counts towards the penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryScope {
    /// Every round generated so far.
    #[default]
    Full,
    /// Only the most recent N rounds.
    Trailing(usize),
}

/// Scheduling policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Smallest roster accepted at the boundary
    #[serde(default = "default_min_roster_size")]
    pub min_roster_size: usize,

    /// Random four-player samples tried per round
    #[serde(default = "default_trial_budget")]
    pub trial_budget: usize,

    /// Rounds in a row a player may play before being benched
    #[serde(default = "default_max_consecutive_played")]
    pub max_consecutive_played: u32,

    /// Trailing window (in rounds) the rest rule looks at
    #[serde(default = "default_rest_window")]
    pub rest_window: usize,

    /// Rests within the window after which a player is owed a game
    #[serde(default = "default_max_rests_in_window")]
    pub max_rests_in_window: usize,

    #[serde(default)]
    pub penalty_mode: PenaltyMode,

    #[serde(default)]
    pub history_scope: HistoryScope,

    /// Clear every streak after a round that needed the widened pool
    #[serde(default)]
    pub reset_streaks_on_widen: bool,
}

fn default_min_roster_size() -> usize {
    6
}

fn default_trial_budget() -> usize {
    48
}

fn default_max_consecutive_played() -> u32 {
    2
}

fn default_rest_window() -> usize {
    3
}

fn default_max_rests_in_window() -> usize {
    2
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_roster_size: default_min_roster_size(),
            trial_budget: default_trial_budget(),
            max_consecutive_played: default_max_consecutive_played(),
            rest_window: default_rest_window(),
            max_rests_in_window: default_max_rests_in_window(),
            penalty_mode: PenaltyMode::default(),
            history_scope: HistoryScope::default(),
            reset_streaks_on_widen: false,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            scheduler: SchedulerConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scheduler.validate()?;

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl SchedulerConfig {
    /// Validate the scheduling policy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_roster_size < 5 {
            return Err(ConfigError::ValidationError(
                "min_roster_size must be at least 5 (four on court plus one resting)".to_string(),
            ));
        }

        if self.trial_budget == 0 {
            return Err(ConfigError::ValidationError(
                "trial_budget must be greater than 0".to_string(),
            ));
        }

        if self.max_consecutive_played == 0 {
            return Err(ConfigError::ValidationError(
                "max_consecutive_played must be greater than 0".to_string(),
            ));
        }

        if self.rest_window == 0 {
            return Err(ConfigError::ValidationError(
                "rest_window must be greater than 0".to_string(),
            ));
        }

        if self.max_rests_in_window == 0 || self.max_rests_in_window > self.rest_window {
            return Err(ConfigError::ValidationError(format!(
                "max_rests_in_window must be between 1 and rest_window ({})",
                self.rest_window
            )));
        }

        if self.history_scope == HistoryScope::Trailing(0) {
            return Err(ConfigError::ValidationError(
                "trailing history window must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
