//! Error types for property recommendation

use crate::features::Feature;
use thiserror::Error;

/// Result type for recommendation operations
pub type Result<T> = std::result::Result<T, RecommendError>;

/// Errors that can occur while scoring and ranking properties
#[derive(Debug, Error)]
pub enum RecommendError {
    /// Malformed table, preferences, `top_n` or configuration
    #[error("Input validation error: {0}")]
    InputValidation(String),

    /// A feature column has zero variance and the policy rejects it
    #[error("Degenerate feature: `{feature}` has zero variance across the property table")]
    DegenerateFeature {
        /// The constant column
        feature: Feature,
    },

    /// A feature vector does not have one value per feature
    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch {
        /// Number of features the matrix carries
        expected: usize,
        /// Length of the offending vector
        actual: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RecommendError {
    /// Create an input validation error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::InputValidation(msg.into())
    }

    /// Create a degenerate feature error
    pub fn degenerate(feature: Feature) -> Self {
        Self::DegenerateFeature { feature }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Whether this error was caused by caller-supplied data
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InputValidation(_) | Self::DegenerateFeature { .. } | Self::DimensionMismatch { .. }
        )
    }
}
