//! Similarity computation utilities

use crate::error::{RecommendError, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use std::cmp::Ordering;

/// Compute cosine similarity between two vectors
///
/// Returns `0.0` when either vector has zero norm. Callers must pass vectors
/// of equal length; use [`cosine_similarities`] for checked batch scoring.
pub fn cosine_similarity(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let dot = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        // Rounding can push identical vectors a hair past 1.
        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Cosine similarity of `query` against every row of `matrix`
pub fn cosine_similarities(query: ArrayView1<f64>, matrix: ArrayView2<f64>) -> Result<Array1<f64>> {
    if query.len() != matrix.ncols() {
        return Err(RecommendError::dimension_mismatch(matrix.ncols(), query.len()));
    }

    Ok(matrix
        .rows()
        .into_iter()
        .map(|row| cosine_similarity(query, row))
        .collect())
}

/// Row indices ordered by score, highest first
///
/// The sort is stable, so equal scores keep their original row order.
pub fn rank_descending(scores: ArrayView1<f64>) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });
    indices
}

/// The `k` best `(index, score)` pairs, highest score first
pub fn top_k(scores: ArrayView1<f64>, k: usize) -> Vec<(usize, f64)> {
    let mut ranked = rank_descending(scores);
    ranked.truncate(k);
    ranked.into_iter().map(|i| (i, scores[i])).collect()
}
