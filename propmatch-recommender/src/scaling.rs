//! Z-score standardization of property features
//!
//! Statistics are fit from the current table and returned as a value;
//! nothing here keeps state between calls.

use crate::config::ZeroVariancePolicy;
use crate::error::{RecommendError, Result};
use crate::features::FEATURE_ORDER;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Relative tolerance under which a column's spread counts as zero
pub const ZERO_VARIANCE_TOLERANCE: f64 = 1e-12;

/// Per-feature mean and population standard deviation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerStats {
    /// Mean of each feature column
    pub mean: Array1<f64>,
    /// Standard deviation of each feature column (ddof = 0)
    pub std: Array1<f64>,
}

impl ScalerStats {
    /// Fit statistics over the rows of `features`
    pub fn fit(features: ArrayView2<f64>) -> Result<Self> {
        let mean = features
            .mean_axis(Axis(0))
            .ok_or_else(|| RecommendError::input("cannot fit scaler on an empty matrix"))?;
        let std = features.std_axis(Axis(0), 0.0);
        Ok(Self { mean, std })
    }

    /// Number of features the statistics cover
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Whether column `j` has no usable spread
    pub fn is_degenerate(&self, j: usize) -> bool {
        self.std[j] <= ZERO_VARIANCE_TOLERANCE * self.mean[j].abs().max(1.0)
    }

    /// Indices of all zero-variance columns
    pub fn degenerate_columns(&self) -> Vec<usize> {
        (0..self.dim()).filter(|&j| self.is_degenerate(j)).collect()
    }

    /// Apply the zero-variance policy to these statistics
    ///
    /// Under `Reject` the first degenerate column is an error; under
    /// `ZeroColumn` the degenerate columns are logged and later scaled to 0.
    pub fn check_policy(&self, policy: ZeroVariancePolicy) -> Result<()> {
        let degenerate = self.degenerate_columns();
        if degenerate.is_empty() {
            return Ok(());
        }

        match policy {
            ZeroVariancePolicy::Reject => {
                Err(RecommendError::degenerate(FEATURE_ORDER[degenerate[0]]))
            }
            ZeroVariancePolicy::ZeroColumn => {
                for &j in &degenerate {
                    warn!(
                        feature = %FEATURE_ORDER[j],
                        "zero-variance feature column, scaling it to zero"
                    );
                }
                Ok(())
            }
        }
    }

    /// Standardize a single vector with these statistics
    pub fn transform_vector(&self, values: ArrayView1<f64>) -> Result<Array1<f64>> {
        if values.len() != self.dim() {
            return Err(RecommendError::dimension_mismatch(self.dim(), values.len()));
        }

        Ok(Array1::from_iter(
            values.iter().enumerate().map(|(j, &v)| self.scale(j, v)),
        ))
    }

    /// Standardize every row of a matrix with these statistics
    pub fn transform(&self, features: ArrayView2<f64>) -> Result<Array2<f64>> {
        if features.ncols() != self.dim() {
            return Err(RecommendError::dimension_mismatch(self.dim(), features.ncols()));
        }

        let mut scaled = features.to_owned();
        for mut row in scaled.rows_mut() {
            for (j, val) in row.iter_mut().enumerate() {
                *val = self.scale(j, *val);
            }
        }
        Ok(scaled)
    }

    fn scale(&self, j: usize, value: f64) -> f64 {
        if self.is_degenerate(j) {
            0.0
        } else {
            (value - self.mean[j]) / self.std[j]
        }
    }
}

/// Fit statistics on `features` and return the standardized matrix with them
pub fn standardize(
    features: ArrayView2<f64>,
    policy: ZeroVariancePolicy,
) -> Result<(Array2<f64>, ScalerStats)> {
    let stats = ScalerStats::fit(features)?;
    stats.check_policy(policy)?;
    let scaled = stats.transform(features)?;
    debug!(
        rows = scaled.nrows(),
        cols = scaled.ncols(),
        "standardized feature matrix"
    );
    Ok((scaled, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_fit_population_std() {
        let features = array![[1.0, 10.0], [3.0, 30.0]];
        let stats = ScalerStats::fit(features.view()).unwrap();
        assert_eq!(stats.mean.to_vec(), vec![2.0, 20.0]);
        assert_eq!(stats.std.to_vec(), vec![1.0, 10.0]);
    }

    #[test]
    fn test_standardize_zero_mean_unit_std() {
        let features = array![
            [100.0, 50.0, 2.0, 8.0, 9.0],
            [500.0, 200.0, 4.0, 3.0, 4.0],
            [300.0, 120.0, 3.0, 5.0, 7.0],
            [250.0, 90.0, 1.0, 9.0, 6.0],
        ];
        let (scaled, _) = standardize(features.view(), ZeroVariancePolicy::ZeroColumn).unwrap();

        let mean = scaled.mean_axis(Axis(0)).unwrap();
        let std = scaled.std_axis(Axis(0), 0.0);
        for j in 0..scaled.ncols() {
            assert_relative_eq!(mean[j], 0.0, epsilon = 1e-12);
            assert_relative_eq!(std[j], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_variance_column_zeroed() {
        let features = array![[1.0, 0.1, 5.0], [2.0, 0.1, 6.0], [3.0, 0.1, 7.0]];
        let (scaled, stats) = standardize(features.view(), ZeroVariancePolicy::ZeroColumn).unwrap();

        assert_eq!(stats.degenerate_columns(), vec![1]);
        assert!(scaled.column(1).iter().all(|&v| v == 0.0));
        assert!(scaled.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_zero_variance_rejected() {
        let features = array![
            [100.0, 50.0, 2.0, 8.0, 9.0],
            [500.0, 200.0, 2.0, 3.0, 4.0],
        ];
        let err = standardize(features.view(), ZeroVariancePolicy::Reject).unwrap_err();
        assert!(matches!(
            err,
            RecommendError::DegenerateFeature { feature: Feature::Bedrooms }
        ));
    }

    #[test]
    fn test_single_row_all_degenerate() {
        let features = array![[100.0, 50.0, 2.0, 8.0, 9.0]];
        let (scaled, stats) = standardize(features.view(), ZeroVariancePolicy::ZeroColumn).unwrap();
        assert_eq!(stats.degenerate_columns().len(), 5);
        assert!(scaled.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_transform_vector_matches_rows() {
        let features = array![[1.0, 4.0], [3.0, 8.0], [5.0, 6.0]];
        let (scaled, stats) = standardize(features.view(), ZeroVariancePolicy::ZeroColumn).unwrap();

        let projected = stats.transform_vector(features.row(2)).unwrap();
        assert_eq!(projected, scaled.row(2).to_owned());
    }

    #[test]
    fn test_transform_vector_dimension_mismatch() {
        let stats = ScalerStats::fit(array![[1.0, 2.0], [3.0, 4.0]].view()).unwrap();
        let err = stats.transform_vector(array![1.0, 2.0, 3.0].view()).unwrap_err();
        assert!(matches!(
            err,
            RecommendError::DimensionMismatch { expected: 2, actual: 3 }
        ));
    }
}
