//! Runtime configuration for the tutor.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATA_DIR: &str = ".omniscience";
pub const DEFAULT_REASONING_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_FAST_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_MAX_TOKENS: usize = 4096;
pub const DEFAULT_THINKING_BUDGET: usize = 4096;

/// Errors from reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got `{value}`")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Models, token limits and the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorConfig {
    pub data_dir: PathBuf,
    pub reasoning_model: String,
    pub fast_model: String,
    pub max_tokens: usize,
    /// Extended thinking budget for the solver. `None` disables thinking.
    pub thinking_budget: Option<usize>,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            reasoning_model: DEFAULT_REASONING_MODEL.to_string(),
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            thinking_budget: Some(DEFAULT_THINKING_BUDGET),
        }
    }
}

impl TutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from the `TUTOR_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from any variable source.
    ///
    /// A `TUTOR_THINKING_BUDGET` of `0` turns extended thinking off.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("TUTOR_DATA_DIR") {
            config.data_dir = PathBuf::from(non_empty("TUTOR_DATA_DIR", dir)?);
        }
        if let Some(model) = lookup("TUTOR_REASONING_MODEL") {
            config.reasoning_model = non_empty("TUTOR_REASONING_MODEL", model)?;
        }
        if let Some(model) = lookup("TUTOR_FAST_MODEL") {
            config.fast_model = non_empty("TUTOR_FAST_MODEL", model)?;
        }
        if let Some(value) = lookup("TUTOR_MAX_TOKENS") {
            config.max_tokens = parse_number("TUTOR_MAX_TOKENS", &value)?;
        }
        if let Some(value) = lookup("TUTOR_THINKING_BUDGET") {
            let budget = parse_number("TUTOR_THINKING_BUDGET", &value)?;
            config.thinking_budget = (budget > 0).then_some(budget);
        }

        Ok(config)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_reasoning_model(mut self, model: impl Into<String>) -> Self {
        self.reasoning_model = model.into();
        self
    }

    pub fn with_fast_model(mut self, model: impl Into<String>) -> Self {
        self.fast_model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_thinking_budget(mut self, budget: Option<usize>) -> Self {
        self.thinking_budget = budget;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File the terminal front end logs to.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("tutor.log")
    }
}

fn non_empty(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { var });
    }
    Ok(trimmed.to_string())
}

fn parse_number(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}
