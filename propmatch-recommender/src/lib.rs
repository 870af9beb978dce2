//! Property recommendations by feature similarity
//!
//! This crate ranks candidate properties against a user's stated preferences.
//! It includes:
//!
//! - An explicit, ordered feature list shared by every vector the crate builds
//! - Z-score standardization fit fresh from the candidate table on each call
//! - Cosine similarity scoring with stable, descending ranking
//!
//! ```
//! use propmatch_recommender::{Property, PropertyRecommender, PropertyTable, UserPreferences};
//!
//! let table = PropertyTable::new(vec![
//!     Property::new(100.0, 50.0, 2.0, 8.0, 9.0),
//!     Property::new(500.0, 200.0, 4.0, 3.0, 4.0),
//! ]);
//! let prefs = UserPreferences::new(100.0, 50.0, 2.0, 8.0, 9.0)?;
//!
//! let best = PropertyRecommender::new(table).recommend_properties(&prefs, 1)?;
//! assert_eq!(best.get(0).map(|p| p.price), Some(100.0));
//! # Ok::<(), propmatch_recommender::RecommendError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod features;
pub mod preferences;
pub mod property;
pub mod recommender;
pub mod scaling;
pub mod similarity;

// Re-export core types
pub use config::{RecommenderConfig, TopNPolicy, ZeroVariancePolicy, DEFAULT_TOP_N};
pub use error::{RecommendError, Result};
pub use features::{Feature, FEATURE_COUNT, FEATURE_ORDER};
pub use preferences::UserPreferences;
pub use property::{Property, PropertyTable};
pub use recommender::{PropertyRecommender, Recommendation, ScaledFeatures};
pub use scaling::ScalerStats;
pub use similarity::cosine_similarity;
