//! Property recommender: scale, score, rank, slice

use crate::config::{RecommenderConfig, TopNPolicy};
use crate::error::{RecommendError, Result};
use crate::preferences::UserPreferences;
use crate::property::{Property, PropertyTable};
use crate::scaling::{standardize, ScalerStats};
use crate::similarity::{cosine_similarities, rank_descending};
use ndarray::{Array1, Array2, ArrayView1};
use tracing::{debug, trace};

/// Standardized feature matrix together with the statistics used to build it
#[derive(Debug, Clone)]
pub struct ScaledFeatures {
    /// `[rows, FEATURE_COUNT]` standardized matrix, row-aligned with the table
    pub matrix: Array2<f64>,
    /// Statistics fit from the table for this call
    pub stats: ScalerStats,
}

/// One ranked result
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation<'a> {
    /// 1-based position in the result list
    pub rank: usize,
    /// Row index in the property table
    pub index: usize,
    /// Cosine similarity to the user's preferences
    pub score: f64,
    /// The recommended property
    pub property: &'a Property,
}

/// Ranks properties against user preferences
///
/// The recommender only holds its table and configuration. Scaler statistics
/// are refit on every call, so repeated calls with the same input return the
/// same output.
#[derive(Debug, Clone)]
pub struct PropertyRecommender {
    table: PropertyTable,
    config: RecommenderConfig,
}

impl PropertyRecommender {
    /// Create a recommender with the default configuration
    pub fn new(table: PropertyTable) -> Self {
        Self {
            table,
            config: RecommenderConfig::default(),
        }
    }

    /// Create a recommender with an explicit configuration
    pub fn with_config(table: PropertyTable, config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { table, config })
    }

    /// The candidate table
    pub fn table(&self) -> &PropertyTable {
        &self.table
    }

    /// The active configuration
    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Standardize every feature column of the table
    pub fn preprocess_features(&self) -> Result<ScaledFeatures> {
        let raw = self.table.feature_matrix()?;
        let (matrix, stats) = standardize(raw.view(), self.config.zero_variance)?;
        debug!(rows = matrix.nrows(), "preprocessed property features");
        Ok(ScaledFeatures { matrix, stats })
    }

    /// Cosine similarity of the user's preferences to every property
    ///
    /// The preferences are standardized with the table's statistics first, so
    /// both sides live in the same feature space. The result is index-aligned
    /// with the table.
    pub fn calculate_similarity(&self, preferences: &UserPreferences) -> Result<Array1<f64>> {
        let scaled = self.preprocess_features()?;
        score_against(&scaled, preferences)
    }

    /// The `top_n` most similar properties, best first
    pub fn recommend_properties(
        &self,
        preferences: &UserPreferences,
        top_n: usize,
    ) -> Result<PropertyTable> {
        Ok(self
            .recommend_scored(preferences, top_n)?
            .into_iter()
            .map(|rec| rec.property.clone())
            .collect())
    }

    /// [`recommend_properties`](Self::recommend_properties) with the configured default count
    pub fn recommend(&self, preferences: &UserPreferences) -> Result<PropertyTable> {
        self.recommend_properties(preferences, self.config.default_top_n)
    }

    /// The `top_n` most similar properties with their scores, best first
    ///
    /// Equal scores keep table order.
    pub fn recommend_scored(
        &self,
        preferences: &UserPreferences,
        top_n: usize,
    ) -> Result<Vec<Recommendation<'_>>> {
        let count = self.resolve_top_n(top_n)?;
        let scores = self.calculate_similarity(preferences)?;

        let mut ranked = rank_descending(scores.view());
        ranked.truncate(count);

        debug!(
            requested = top_n,
            returned = ranked.len(),
            candidates = self.table.len(),
            "ranked properties"
        );

        ranked
            .into_iter()
            .enumerate()
            .map(|(pos, index)| {
                self.table
                    .get(index)
                    .map(|property| Recommendation {
                        rank: pos + 1,
                        index,
                        score: scores[index],
                        property,
                    })
                    .ok_or_else(|| {
                        RecommendError::input(format!("row {} missing from property table", index))
                    })
            })
            .collect()
    }

    fn resolve_top_n(&self, top_n: usize) -> Result<usize> {
        if top_n == 0 {
            return Err(RecommendError::input("top_n must be a positive integer"));
        }
        if self.table.is_empty() {
            return Err(RecommendError::input("property table is empty"));
        }

        let rows = self.table.len();
        if top_n <= rows {
            return Ok(top_n);
        }

        match self.config.top_n_overflow {
            TopNPolicy::Clamp => Ok(rows),
            TopNPolicy::Reject => Err(RecommendError::input(format!(
                "top_n ({}) exceeds the number of properties ({})",
                top_n, rows
            ))),
        }
    }
}

/// Score preferences against an already standardized table
pub fn score_against(scaled: &ScaledFeatures, preferences: &UserPreferences) -> Result<Array1<f64>> {
    let user = scaled
        .stats
        .transform_vector(ArrayView1::from(preferences.as_slice()))?;
    let scores = cosine_similarities(user.view(), scaled.matrix.view())?;
    trace!(?scores, "similarity scores");
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZeroVariancePolicy;
    use crate::features::Feature;
    use approx::assert_relative_eq;

    fn two_property_table() -> PropertyTable {
        PropertyTable::new(vec![
            Property::new(100.0, 50.0, 2.0, 8.0, 9.0).with_attribute("name", "studio"),
            Property::new(500.0, 200.0, 4.0, 3.0, 4.0).with_attribute("name", "villa"),
        ])
    }

    fn sample_table() -> PropertyTable {
        PropertyTable::new(vec![
            Property::new(320_000.0, 85.0, 3.0, 7.0, 8.0).with_attribute("id", 1),
            Property::new(150_000.0, 40.0, 1.0, 9.0, 6.0).with_attribute("id", 2),
            Property::new(780_000.0, 210.0, 5.0, 3.0, 9.0).with_attribute("id", 3),
            Property::new(410_000.0, 110.0, 3.0, 6.0, 7.0).with_attribute("id", 4),
            Property::new(260_000.0, 70.0, 2.0, 8.0, 5.0).with_attribute("id", 5),
            Property::new(560_000.0, 150.0, 4.0, 4.0, 8.0).with_attribute("id", 6),
        ])
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let recommender = PropertyRecommender::new(two_property_table());
        let prefs = UserPreferences::new(100.0, 50.0, 2.0, 8.0, 9.0).unwrap();

        let result = recommender.recommend_properties(&prefs, 1).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(0).unwrap().attributes["name"], "studio");

        let scores = recommender.calculate_similarity(&prefs).unwrap();
        assert_relative_eq!(scores[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(scores[1], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scores_sorted_descending() {
        let recommender = PropertyRecommender::new(sample_table());
        let prefs = UserPreferences::new(300_000.0, 90.0, 3.0, 7.0, 7.0).unwrap();

        let recs = recommender.recommend_scored(&prefs, 4).unwrap();
        assert_eq!(recs.len(), 4);
        for pair in recs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for (i, rec) in recs.iter().enumerate() {
            assert_eq!(rec.rank, i + 1);
        }
    }

    #[test]
    fn test_scored_matches_similarity() {
        let recommender = PropertyRecommender::new(sample_table());
        let prefs = UserPreferences::new(500_000.0, 150.0, 4.0, 5.0, 9.0).unwrap();

        let scores = recommender.calculate_similarity(&prefs).unwrap();
        for rec in recommender.recommend_scored(&prefs, 6).unwrap() {
            assert_eq!(rec.score, scores[rec.index]);
            assert_eq!(rec.property, recommender.table().get(rec.index).unwrap());
        }
    }

    #[test]
    fn test_default_top_n() {
        let recommender = PropertyRecommender::new(sample_table());
        let prefs = UserPreferences::new(300_000.0, 90.0, 3.0, 7.0, 7.0).unwrap();
        assert_eq!(recommender.recommend(&prefs).unwrap().len(), 5);

        let config = RecommenderConfig::new().default_top_n(2);
        let recommender = PropertyRecommender::with_config(sample_table(), config).unwrap();
        assert_eq!(recommender.recommend(&prefs).unwrap().len(), 2);
    }

    #[test]
    fn test_top_n_overflow_policies() {
        let prefs = UserPreferences::new(100.0, 50.0, 2.0, 8.0, 9.0).unwrap();

        let clamp = PropertyRecommender::new(two_property_table());
        assert_eq!(clamp.recommend_properties(&prefs, 10).unwrap().len(), 2);

        let config = RecommenderConfig::new().top_n_overflow(TopNPolicy::Reject);
        let reject = PropertyRecommender::with_config(two_property_table(), config).unwrap();
        let err = reject.recommend_properties(&prefs, 10).unwrap_err();
        assert!(matches!(err, RecommendError::InputValidation(_)));
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let recommender = PropertyRecommender::new(two_property_table());
        let prefs = UserPreferences::new(100.0, 50.0, 2.0, 8.0, 9.0).unwrap();
        let err = recommender.recommend_properties(&prefs, 0).unwrap_err();
        assert!(err.to_string().contains("top_n"));
    }

    #[test]
    fn test_empty_table() {
        let recommender = PropertyRecommender::new(PropertyTable::default());
        let prefs = UserPreferences::new(100.0, 50.0, 2.0, 8.0, 9.0).unwrap();

        assert!(matches!(
            recommender.recommend_properties(&prefs, 3),
            Err(RecommendError::InputValidation(_))
        ));
        assert!(matches!(
            recommender.calculate_similarity(&prefs),
            Err(RecommendError::InputValidation(_))
        ));
    }

    #[test]
    fn test_zero_variance_bedrooms() {
        let table = PropertyTable::new(vec![
            Property::new(100.0, 50.0, 3.0, 8.0, 9.0),
            Property::new(500.0, 200.0, 3.0, 3.0, 4.0),
            Property::new(300.0, 120.0, 3.0, 5.0, 6.0),
        ]);
        let prefs = UserPreferences::new(100.0, 50.0, 1.0, 8.0, 9.0).unwrap();

        let zeroing = PropertyRecommender::new(table.clone());
        let scaled = zeroing.preprocess_features().unwrap();
        assert!(scaled
            .matrix
            .column(Feature::Bedrooms.index())
            .iter()
            .all(|&v| v == 0.0));

        let scores = zeroing.calculate_similarity(&prefs).unwrap();
        assert!(scores.iter().all(|s| s.is_finite()));
        assert_eq!(
            zeroing.recommend_properties(&prefs, 1).unwrap().get(0),
            table.get(0)
        );

        let config = RecommenderConfig::new().zero_variance(ZeroVariancePolicy::Reject);
        let rejecting = PropertyRecommender::with_config(table, config).unwrap();
        assert!(matches!(
            rejecting.recommend_properties(&prefs, 1),
            Err(RecommendError::DegenerateFeature { feature: Feature::Bedrooms })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RecommenderConfig::new().default_top_n(0);
        assert!(PropertyRecommender::with_config(sample_table(), config).is_err());
    }
}
