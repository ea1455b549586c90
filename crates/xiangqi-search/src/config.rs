//! Search configuration.
//!
//! A [`SearchConfig`] bounds one search by depth, time and quiescence budget
//! and sizes the transposition cache. Configurations come from a
//! [`Difficulty`] preset or from a TOML file; fields missing from the file
//! fall back to the Professional preset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The requested difficulty preset does not exist.
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),
    /// The configuration parsed but cannot drive a search.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Search limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Deepest iterative-deepening iteration.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    /// Soft time budget in milliseconds, checked after each completed depth.
    #[serde(default = "default_time_limit_ms")]
    pub time_limit_ms: u64,
    /// Capture plies searched past the horizon.
    #[serde(default = "default_quiescence_depth")]
    pub quiescence_depth: u32,
    /// Transposition cache capacity in entries.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_max_depth() -> u32 {
    Difficulty::Professional.config().max_depth
}

fn default_time_limit_ms() -> u64 {
    Difficulty::Professional.config().time_limit_ms
}

fn default_quiescence_depth() -> u32 {
    Difficulty::Professional.config().quiescence_depth
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

/// Default transposition cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 1_000_000;

impl Default for SearchConfig {
    fn default() -> Self {
        Difficulty::Professional.config()
    }
}

impl SearchConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for invalid TOML and
    /// [`ConfigError::Invalid`] for a zero depth or cache capacity.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read, plus
    /// everything [`Self::from_toml_str`] returns.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks that the configuration can drive a search.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "cache_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The time budget as a [`Duration`].
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

/// Difficulty presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Professional,
    Master,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Professional,
        Difficulty::Master,
    ];

    /// The search limits of this preset.
    pub const fn config(self) -> SearchConfig {
        let (max_depth, time_limit_ms, quiescence_depth) = match self {
            Difficulty::Beginner => (1, 500, 0),
            Difficulty::Intermediate => (2, 1000, 1),
            Difficulty::Advanced => (3, 2000, 2),
            Difficulty::Professional => (4, 4000, 3),
            Difficulty::Master => (5, 6000, 3),
        };
        SearchConfig {
            max_depth,
            time_limit_ms,
            quiescence_depth,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Professional => "professional",
            Difficulty::Master => "master",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownDifficulty(s.to_string()))
    }
}
