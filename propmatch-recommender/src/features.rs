//! The numeric property features used for matching
//!
//! Column order matters everywhere a feature vector is built: the property
//! matrix, the fitted scaler statistics and the user vector all index by
//! position in [`FEATURE_ORDER`]. Nothing else decides ordering.

use crate::error::{RecommendError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of features in a property feature vector
pub const FEATURE_COUNT: usize = 5;

/// Canonical column order shared by scaling and user-vector construction
pub const FEATURE_ORDER: [Feature; FEATURE_COUNT] = [
    Feature::Price,
    Feature::AreaSqm,
    Feature::Bedrooms,
    Feature::WalkabilityScore,
    Feature::SafetyIndex,
];

/// A numeric property attribute that takes part in similarity scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Asking price
    Price,
    /// Floor area in square meters
    AreaSqm,
    /// Number of bedrooms
    Bedrooms,
    /// Walkability score of the neighborhood
    WalkabilityScore,
    /// Safety index of the neighborhood
    SafetyIndex,
}

impl Feature {
    /// Column name used in records and preference maps
    pub fn name(self) -> &'static str {
        match self {
            Feature::Price => "price",
            Feature::AreaSqm => "area_sqm",
            Feature::Bedrooms => "bedrooms",
            Feature::WalkabilityScore => "walkability_score",
            Feature::SafetyIndex => "safety_index",
        }
    }

    /// Position of this feature in [`FEATURE_ORDER`]
    pub fn index(self) -> usize {
        match self {
            Feature::Price => 0,
            Feature::AreaSqm => 1,
            Feature::Bedrooms => 2,
            Feature::WalkabilityScore => 3,
            Feature::SafetyIndex => 4,
        }
    }

    /// Iterate features in canonical order
    pub fn all() -> impl Iterator<Item = Feature> {
        FEATURE_ORDER.into_iter()
    }

    /// Comma separated list of every feature name, for error messages
    pub(crate) fn expected_names() -> String {
        FEATURE_ORDER
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self> {
        Feature::all().find(|f| f.name() == s).ok_or_else(|| {
            RecommendError::input(format!(
                "unknown feature `{}` (expected one of: {})",
                s,
                Feature::expected_names()
            ))
        })
    }
}
