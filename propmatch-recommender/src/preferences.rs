//! User preference vectors

use crate::error::{RecommendError, Result};
use crate::features::{Feature, FEATURE_COUNT, FEATURE_ORDER};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// A user's target value for every feature, stored in canonical order
///
/// Construction is the only place validation happens, so a value of this
/// type always carries exactly one finite number per feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserPreferences {
    values: [f64; FEATURE_COUNT],
}

impl UserPreferences {
    /// Create preferences from explicit values
    pub fn new(
        price: f64,
        area_sqm: f64,
        bedrooms: f64,
        walkability_score: f64,
        safety_index: f64,
    ) -> Result<Self> {
        Self::from_vector(&[price, area_sqm, bedrooms, walkability_score, safety_index])
    }

    /// Create preferences from values already in [`FEATURE_ORDER`]
    pub fn from_vector(values: &[f64]) -> Result<Self> {
        if values.len() != FEATURE_COUNT {
            return Err(RecommendError::dimension_mismatch(FEATURE_COUNT, values.len()));
        }

        let mut ordered = [0.0; FEATURE_COUNT];
        for (feature, &value) in FEATURE_ORDER.iter().zip(values) {
            ordered[feature.index()] = check_finite(*feature, value)?;
        }
        Ok(Self { values: ordered })
    }

    /// Create preferences from a key/value mapping
    ///
    /// Keys may arrive in any order but must name every feature exactly once.
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut slots: [Option<f64>; FEATURE_COUNT] = [None; FEATURE_COUNT];
        let mut seen_any = false;

        for (key, value) in pairs {
            seen_any = true;
            let key = key.as_ref();
            let feature: Feature = key.parse().map_err(|_| {
                RecommendError::input(format!(
                    "unrecognized preference key `{}` (expected: {})",
                    key,
                    Feature::expected_names()
                ))
            })?;
            let slot = &mut slots[feature.index()];
            if slot.is_some() {
                return Err(RecommendError::input(format!(
                    "duplicate preference key `{}`",
                    key
                )));
            }
            *slot = Some(check_finite(feature, value)?);
        }

        if !seen_any {
            return Err(RecommendError::input("user preferences are empty"));
        }

        let missing: BTreeSet<&str> = FEATURE_ORDER
            .iter()
            .filter(|f| slots[f.index()].is_none())
            .map(|f| f.name())
            .collect();
        if !missing.is_empty() {
            return Err(RecommendError::input(format!(
                "user preferences missing required keys: {}",
                missing.into_iter().collect::<Vec<_>>().join(", ")
            )));
        }

        let mut values = [0.0; FEATURE_COUNT];
        for (value, slot) in values.iter_mut().zip(slots) {
            *value = slot.unwrap_or_default();
        }
        Ok(Self { values })
    }

    /// Create preferences from a JSON object of numbers
    pub fn from_json_map(map: &Map<String, Value>) -> Result<Self> {
        let pairs = map
            .iter()
            .map(|(key, value)| {
                value.as_f64().map(|v| (key.as_str(), v)).ok_or_else(|| {
                    RecommendError::input(format!(
                        "preference `{}` is not numeric: {}",
                        key, value
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_pairs(pairs)
    }

    /// Target value for a single feature
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Values in canonical order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

impl TryFrom<&Value> for UserPreferences {
    type Error = RecommendError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => UserPreferences::from_json_map(map),
            other => Err(RecommendError::input(format!(
                "user preferences must be an object, got {}",
                other
            ))),
        }
    }
}

fn check_finite(feature: Feature, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RecommendError::input(format!(
            "preference `{}` must be finite, got {}",
            feature, value
        )))
    }
}
