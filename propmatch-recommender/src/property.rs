//! Property records and the candidate table

use crate::error::{RecommendError, Result};
use crate::features::{Feature, FEATURE_COUNT, FEATURE_ORDER};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A candidate property
///
/// The five numeric features drive scoring. Every other field of the source
/// record lives in `attributes` and is returned untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Asking price
    pub price: f64,
    /// Floor area in square meters
    pub area_sqm: f64,
    /// Number of bedrooms
    pub bedrooms: f64,
    /// Walkability score
    pub walkability_score: f64,
    /// Safety index
    pub safety_index: f64,
    /// Descriptive fields carried through unchanged
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Property {
    /// Create a property with no descriptive attributes
    pub fn new(
        price: f64,
        area_sqm: f64,
        bedrooms: f64,
        walkability_score: f64,
        safety_index: f64,
    ) -> Self {
        Self {
            price,
            area_sqm,
            bedrooms,
            walkability_score,
            safety_index,
            attributes: Map::new(),
        }
    }

    /// Attach a descriptive attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Build a property from a record, validating every feature column
    ///
    /// Feature columns must be present and numeric. Remaining keys become
    /// descriptive attributes.
    pub fn from_record(mut record: Map<String, Value>) -> Result<Self> {
        let mut values = [0.0; FEATURE_COUNT];
        for feature in FEATURE_ORDER {
            let value = record.remove(feature.name()).ok_or_else(|| {
                RecommendError::input(format!("missing feature column `{}`", feature))
            })?;
            values[feature.index()] = value.as_f64().ok_or_else(|| {
                RecommendError::input(format!(
                    "feature column `{}` is not numeric: {}",
                    feature, value
                ))
            })?;
        }

        let [price, area_sqm, bedrooms, walkability_score, safety_index] = values;
        Ok(Self {
            price,
            area_sqm,
            bedrooms,
            walkability_score,
            safety_index,
            attributes: record,
        })
    }

    /// Value of a single feature
    pub fn feature(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Price => self.price,
            Feature::AreaSqm => self.area_sqm,
            Feature::Bedrooms => self.bedrooms,
            Feature::WalkabilityScore => self.walkability_score,
            Feature::SafetyIndex => self.safety_index,
        }
    }

    /// Feature values in canonical order
    pub fn feature_vector(&self) -> [f64; FEATURE_COUNT] {
        FEATURE_ORDER.map(|f| self.feature(f))
    }
}

impl TryFrom<Value> for Property {
    type Error = RecommendError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(record) => Property::from_record(record),
            other => Err(RecommendError::input(format!(
                "property record must be an object, got {}",
                other
            ))),
        }
    }
}

/// Ordered table of candidate properties
///
/// Row order is significant: similarity scores and recommendation indices
/// refer to positions in this table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyTable {
    rows: Vec<Property>,
}

impl PropertyTable {
    /// Create a table from already built properties
    pub fn new(rows: Vec<Property>) -> Self {
        Self { rows }
    }

    /// Build a table from records, failing on the first malformed row
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                Property::from_record(record).map_err(|e| match e {
                    RecommendError::InputValidation(msg) => {
                        RecommendError::input(format!("row {}: {}", i, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at `index`
    pub fn get(&self, index: usize) -> Option<&Property> {
        self.rows.get(index)
    }

    /// Iterate rows in table order
    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.rows.iter()
    }

    /// Rows as a slice
    pub fn as_slice(&self) -> &[Property] {
        &self.rows
    }

    /// Consume the table
    pub fn into_inner(self) -> Vec<Property> {
        self.rows
    }

    /// Build the raw `[rows, FEATURE_COUNT]` feature matrix
    ///
    /// Fails on an empty table or on any non-finite feature value.
    pub fn feature_matrix(&self) -> Result<Array2<f64>> {
        if self.rows.is_empty() {
            return Err(RecommendError::input("property table is empty"));
        }

        let mut matrix = Array2::zeros((self.rows.len(), FEATURE_COUNT));
        for (i, property) in self.rows.iter().enumerate() {
            for feature in FEATURE_ORDER {
                let value = property.feature(feature);
                if !value.is_finite() {
                    return Err(RecommendError::input(format!(
                        "row {}: feature `{}` has no finite value ({})",
                        i, feature, value
                    )));
                }
                matrix[[i, feature.index()]] = value;
            }
        }

        Ok(matrix)
    }
}

impl From<Vec<Property>> for PropertyTable {
    fn from(rows: Vec<Property>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Property> for PropertyTable {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PropertyTable {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for PropertyTable {
    type Item = Property;
    type IntoIter = std::vec::IntoIter<Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
