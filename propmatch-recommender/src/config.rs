//! Recommender configuration

use crate::error::{RecommendError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of recommendations returned when the caller does not ask for a count
pub const DEFAULT_TOP_N: usize = 5;

/// How a feature column with zero variance is scaled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroVariancePolicy {
    /// Scale the column to all zeros so it does not affect similarity
    #[default]
    ZeroColumn,
    /// Fail with a degenerate feature error
    Reject,
}

/// What to do when `top_n` exceeds the number of properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopNPolicy {
    /// Return every property
    #[default]
    Clamp,
    /// Fail with an input validation error
    Reject,
}

/// Configuration for the property recommender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecommenderConfig {
    /// Result count used by `recommend`
    pub default_top_n: usize,
    /// Zero-variance column handling
    pub zero_variance: ZeroVariancePolicy,
    /// Oversized `top_n` handling
    pub top_n_overflow: TopNPolicy,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_top_n: DEFAULT_TOP_N,
            zero_variance: ZeroVariancePolicy::default(),
            top_n_overflow: TopNPolicy::default(),
        }
    }
}

impl RecommenderConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default result count
    pub fn default_top_n(mut self, top_n: usize) -> Self {
        self.default_top_n = top_n;
        self
    }

    /// Set the zero-variance policy
    pub fn zero_variance(mut self, policy: ZeroVariancePolicy) -> Self {
        self.zero_variance = policy;
        self
    }

    /// Set the oversized `top_n` policy
    pub fn top_n_overflow(mut self, policy: TopNPolicy) -> Self {
        self.top_n_overflow = policy;
        self
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.default_top_n == 0 {
            return Err(RecommendError::input("default_top_n must be positive"));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
