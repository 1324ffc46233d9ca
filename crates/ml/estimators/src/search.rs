//! K-fold cross-validation and exhaustive grid search

use common::TuningConfig;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{EstimatorError, EstimatorResult, Hyperparameters, ModelPipeline, Regressor, r2_score};

/// Contiguous, unshuffled k-fold splitter. The first `n % k` folds hold one
/// extra sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KFold {
    n_splits: usize,
}

impl KFold {
    /// Splitter with `n_splits` folds, at least two
    pub fn new(n_splits: usize) -> EstimatorResult<Self> {
        if n_splits < 2 {
            return Err(EstimatorError::InvalidParameter(format!(
                "k-fold needs at least 2 splits, got {n_splits}"
            )));
        }
        Ok(Self { n_splits })
    }

    /// `(train, test)` row positions for each fold
    pub fn split(&self, n_samples: usize) -> EstimatorResult<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits > n_samples {
            return Err(EstimatorError::InvalidParameter(format!(
                "cannot split {n_samples} samples into {} folds",
                self.n_splits
            )));
        }
        let base = n_samples / self.n_splits;
        let extra = n_samples % self.n_splits;
        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let test: Vec<usize> = (start..start + size).collect();
            let train: Vec<usize> = (0..start).chain(start + size..n_samples).collect();
            folds.push((train, test));
            start += size;
        }
        Ok(folds)
    }
}

/// Winning hyperparameters and their mean cross-validated R²
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestParams {
    /// Winning settings
    #[serde(flatten)]
    pub params: Hyperparameters,
    /// Mean R² over the folds
    pub cv_score: f64,
}

/// Exhaustive search over selector `k`, polynomial degree and ridge alpha
#[derive(Debug, Clone, PartialEq)]
pub struct GridSearch {
    folds: KFold,
    selector_k: Vec<usize>,
    poly_degree: Vec<usize>,
    ridge_alpha: Vec<f64>,
    mi_neighbors: usize,
}

impl GridSearch {
    /// Grid built from tuning settings
    pub fn from_config(config: &TuningConfig) -> EstimatorResult<Self> {
        if config.selector_k.is_empty()
            || config.poly_degree.is_empty()
            || config.ridge_alpha.is_empty()
        {
            return Err(EstimatorError::InvalidParameter("empty search grid".into()));
        }
        Ok(Self {
            folds: KFold::new(config.cv_folds)?,
            selector_k: config.selector_k.clone(),
            poly_degree: config.poly_degree.clone(),
            ridge_alpha: config.ridge_alpha.clone(),
            mi_neighbors: config.mi_neighbors,
        })
    }

    /// Candidates in evaluation order; `selector_k` varies fastest
    #[must_use]
    pub fn candidates(&self) -> Vec<Hyperparameters> {
        let mut out = Vec::new();
        for &ridge_alpha in &self.ridge_alpha {
            for &poly_degree in &self.poly_degree {
                for &selector_k in &self.selector_k {
                    out.push(Hyperparameters {
                        selector_k,
                        poly_degree,
                        ridge_alpha,
                    });
                }
            }
        }
        out
    }

    /// Mean fold R² of one candidate
    pub fn score(
        &self,
        feature_names: &[String],
        params: Hyperparameters,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> EstimatorResult<f64> {
        let folds = self.folds.split(x.nrows())?;
        let mut total = 0.0;
        for (train, test) in &folds {
            let mut model = ModelPipeline::new(feature_names.to_vec(), params, self.mi_neighbors);
            model.fit(&x.select(Axis(0), train), &y.select(Axis(0), train))?;
            let predicted = model.predict(&x.select(Axis(0), test))?;
            total += r2_score(&y.select(Axis(0), test), &predicted)?;
        }
        Ok(total / folds.len() as f64)
    }

    /// Evaluate every candidate; the highest mean score wins and ties keep the
    /// earlier candidate. Candidates that fail to fit are skipped.
    pub fn run(
        &self,
        feature_names: &[String],
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> EstimatorResult<BestParams> {
        let candidates = self.candidates();
        info!(
            candidates = candidates.len(),
            folds = self.folds.n_splits,
            rows = x.nrows(),
            "Starting grid search"
        );

        let mut best: Option<BestParams> = None;
        for params in candidates {
            let cv_score = match self.score(feature_names, params, x, y) {
                Ok(score) if score.is_finite() => score,
                Ok(score) => {
                    warn!(?params, score, "Candidate produced a non-finite score");
                    continue;
                }
                Err(e) => {
                    warn!(?params, error = %e, "Candidate failed to fit");
                    continue;
                }
            };
            debug!(?params, cv_score, "Scored candidate");
            if best.is_none_or(|b| cv_score > b.cv_score) {
                best = Some(BestParams { params, cv_score });
            }
        }

        let best = best.ok_or_else(|| {
            EstimatorError::InvalidParameter("no grid candidate could be fitted".into())
        })?;
        info!(params = ?best.params, cv_score = best.cv_score, "Grid search finished");
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kfold_contiguous_with_leading_extras() {
        let folds = KFold::new(3).unwrap().split(7).unwrap();
        let tests: Vec<Vec<usize>> = folds.iter().map(|(_, t)| t.clone()).collect();
        assert_eq!(tests, vec![vec![0, 1, 2], vec![3, 4], vec![5, 6]]);
        assert_eq!(folds[1].0, vec![0, 1, 2, 5, 6]);
    }

    #[test]
    fn test_kfold_rejects_too_few_samples() {
        assert!(KFold::new(3).unwrap().split(2).is_err());
        assert!(KFold::new(1).is_err());
    }

    #[test]
    fn test_candidate_order() {
        let grid = GridSearch::from_config(&TuningConfig {
            cv_folds: 3,
            selector_k: vec![1, 2],
            poly_degree: vec![1],
            ridge_alpha: vec![0.5, 0.1],
            mi_neighbors: 3,
        })
        .unwrap();
        let order: Vec<(f64, usize)> = grid
            .candidates()
            .iter()
            .map(|p| (p.ridge_alpha, p.selector_k))
            .collect();
        assert_eq!(order, vec![(0.5, 1), (0.5, 2), (0.1, 1), (0.1, 2)]);
    }

    #[test]
    fn test_best_params_json_is_flat() {
        let best = BestParams {
            params: Hyperparameters {
                selector_k: 3,
                poly_degree: 2,
                ridge_alpha: 0.1,
            },
            cv_score: 0.75,
        };
        let json = serde_json::to_value(best).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"selector_k": 3, "poly_degree": 2, "ridge_alpha": 0.1, "cv_score": 0.75})
        );
        let back: BestParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, best);
    }
}
