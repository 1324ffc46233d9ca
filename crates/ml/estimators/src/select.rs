//! Univariate feature selection

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::mutual_info::mutual_info_regression;
use crate::{EstimatorError, EstimatorResult, FeatureTransform, check_rows};

/// Keeps the `k` columns with the highest mutual information with the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectKBest {
    k: usize,
    n_neighbors: usize,
    scores: Option<Vec<f64>>,
    selected: Option<Vec<usize>>,
}

impl SelectKBest {
    /// Selector keeping `k` columns, scoring with `n_neighbors` neighbours
    #[must_use]
    pub const fn new(k: usize, n_neighbors: usize) -> Self {
        Self {
            k,
            n_neighbors,
            scores: None,
            selected: None,
        }
    }

    /// Fitted per-column scores
    #[must_use]
    pub fn scores(&self) -> Option<&[f64]> {
        self.scores.as_deref()
    }

    /// Fitted column positions, ascending
    #[must_use]
    pub fn selected(&self) -> Option<&[usize]> {
        self.selected.as_deref()
    }
}

/// Positions of the `k` best scores in ascending column order. Among equal
/// scores the later column wins.
pub(crate) fn top_k(scores: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));
    let mut keep = order.split_off(scores.len().saturating_sub(k));
    keep.sort_unstable();
    keep
}

impl FeatureTransform for SelectKBest {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> EstimatorResult<()> {
        check_rows(x, y)?;
        if self.k == 0 {
            return Err(EstimatorError::InvalidParameter("k must be positive".into()));
        }
        if self.k > x.ncols() {
            warn!(k = self.k, features = x.ncols(), "k exceeds feature count, keeping all features");
        }
        let scores = mutual_info_regression(x, y, self.n_neighbors)?.to_vec();
        self.selected = Some(top_k(&scores, self.k));
        self.scores = Some(scores);
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> EstimatorResult<Array2<f64>> {
        let (Some(selected), Some(scores)) = (&self.selected, &self.scores) else {
            return Err(EstimatorError::NotFitted("SelectKBest"));
        };
        if x.ncols() != scores.len() {
            return Err(EstimatorError::ShapeMismatch {
                expected: scores.len(),
                actual: x.ncols(),
            });
        }
        Ok(x.select(Axis(1), selected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_keeps_column_order() {
        assert_eq!(top_k(&[0.5, 0.1, 0.9, 0.3], 2), vec![0, 2]);
        assert_eq!(top_k(&[0.5, 0.1], 5), vec![0, 1]);
        assert_eq!(top_k(&[0.2, 0.2, 0.2], 1), vec![2]);
    }
}
