//! Tunable limits for curation and summarization.
//!
//! Values are supplied by the configuration loader and passed explicitly to
//! the engine and summary generator constructors.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings consumed by the curation core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurationConfig {
    /// Minimum relevance score to approve an item (default: 0.7)
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: f64,

    /// Maximum summary length in characters (default: 180)
    #[serde(default = "default_summary_max_length")]
    pub summary_max_length: usize,

    /// Content longer than this many characters is summarized (default: 300)
    #[serde(default = "default_content_length_trigger")]
    pub content_length_trigger: usize,

    /// Items summarized concurrently (default: 2, 1 = sequential)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Pause before each generation call, for rate limits (default: 0)
    #[serde(default)]
    pub call_delay_ms: u64,

    /// Per-call generation timeout in seconds (default: 60)
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_seconds: u64,
}

fn default_relevance_threshold() -> f64 {
    0.7
}
fn default_summary_max_length() -> usize {
    180
}
fn default_content_length_trigger() -> usize {
    300
}
fn default_max_concurrency() -> usize {
    2
}
fn default_generation_timeout() -> u64 {
    60
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            relevance_threshold: default_relevance_threshold(),
            summary_max_length: default_summary_max_length(),
            content_length_trigger: default_content_length_trigger(),
            max_concurrency: default_max_concurrency(),
            call_delay_ms: 0,
            generation_timeout_seconds: default_generation_timeout(),
        }
    }
}

impl CurationConfig {
    /// Reject values the core cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.relevance_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.relevance_threshold));
        }

        // Truncation needs room for at least one character before "..."
        if self.summary_max_length < 4 {
            return Err(ConfigError::SummaryTooShort(self.summary_max_length));
        }

        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        if self.generation_timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }

    pub fn call_delay(&self) -> Duration {
        Duration::from_millis(self.call_delay_ms)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_seconds)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Relevance threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("Summary max length must be at least 4 characters, got {0}")]
    SummaryTooShort(usize),

    #[error("Max concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("Generation timeout must be at least 1 second")]
    ZeroTimeout,

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
}
