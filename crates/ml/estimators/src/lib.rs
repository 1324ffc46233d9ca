//! Regression estimators for milk price forecasting
//!
//! The model is a fixed chain: standard scaling, k-best selection by mutual
//! information, polynomial expansion and ridge regression. Each stage is a
//! small `ndarray` implementation; [`ModelPipeline`] strings them together and
//! is what gets tuned, trained, persisted and served.

#![forbid(unsafe_code)]

pub mod error;
pub mod metrics;
pub mod model;
pub mod mutual_info;
pub mod polynomial;
pub mod ridge;
pub mod scaler;
pub mod search;
pub mod select;

pub use error::{EstimatorError, EstimatorResult};
pub use metrics::{Metrics, r2_score, rmse};
pub use model::{Hyperparameters, ModelPipeline};
pub use polynomial::PolynomialFeatures;
pub use ridge::Ridge;
pub use scaler::StandardScaler;
pub use search::{BestParams, GridSearch, KFold};
pub use select::SelectKBest;

use ndarray::{Array1, Array2};

/// A stage that learns from `(x, y)` and rewrites feature matrices
pub trait FeatureTransform: Send + Sync {
    /// Learn the stage's state
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> EstimatorResult<()>;

    /// Apply the fitted stage
    fn transform(&self, x: &Array2<f64>) -> EstimatorResult<Array2<f64>>;

    /// `fit` then `transform`
    fn fit_transform(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> EstimatorResult<Array2<f64>> {
        self.fit(x, y)?;
        self.transform(x)
    }
}

/// A model mapping feature rows to a continuous prediction
pub trait Regressor: Send + Sync {
    /// Fit on a design matrix and target
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> EstimatorResult<()>;

    /// Predict one value per row
    fn predict(&self, x: &Array2<f64>) -> EstimatorResult<Array1<f64>>;
}

pub(crate) fn check_rows(x: &Array2<f64>, y: &Array1<f64>) -> EstimatorResult<()> {
    if x.nrows() == 0 {
        return Err(EstimatorError::EmptyInput);
    }
    if x.nrows() != y.len() {
        return Err(EstimatorError::ShapeMismatch {
            expected: x.nrows(),
            actual: y.len(),
        });
    }
    Ok(())
}
