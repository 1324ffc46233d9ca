//! The full regression pipeline that is tuned, trained and served

use ndarray::{Array1, Array2};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    EstimatorError, EstimatorResult, FeatureTransform, PolynomialFeatures, Regressor, Ridge,
    SelectKBest, StandardScaler, check_rows,
};

/// Tunable settings of a [`ModelPipeline`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Columns kept by the mutual information selector
    pub selector_k: usize,
    /// Polynomial expansion degree
    pub poly_degree: usize,
    /// Ridge regularization strength
    pub ridge_alpha: f64,
}

/// Scaler, k-best selector, polynomial expansion and ridge, plus the ordered
/// feature names the input matrix is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPipeline {
    feature_names: Vec<String>,
    params: Hyperparameters,
    scaler: StandardScaler,
    selector: SelectKBest,
    poly: PolynomialFeatures,
    ridge: Ridge,
}

impl ModelPipeline {
    /// Unfitted pipeline over `feature_names`
    pub fn new(
        feature_names: Vec<String>,
        params: Hyperparameters,
        mi_neighbors: usize,
    ) -> Self {
        Self {
            feature_names,
            params,
            scaler: StandardScaler::new(),
            selector: SelectKBest::new(params.selector_k, mi_neighbors),
            poly: PolynomialFeatures::new(params.poly_degree),
            ridge: Ridge::new(params.ridge_alpha),
        }
    }

    /// Ordered input feature names
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Settings this pipeline was built with
    #[must_use]
    pub const fn params(&self) -> &Hyperparameters {
        &self.params
    }

    /// Fitted selector, for inspecting scores
    #[must_use]
    pub const fn selector(&self) -> &SelectKBest {
        &self.selector
    }

    /// Fitted ridge model
    #[must_use]
    pub const fn ridge(&self) -> &Ridge {
        &self.ridge
    }

    /// Fit on a feature table and its target column
    pub fn fit_frame(&mut self, features: &DataFrame, target: &str) -> EstimatorResult<()> {
        let x = frame::to_matrix(features, &self.feature_names)?;
        let y = Array1::from(frame::to_vec(features, target)?);
        self.fit(&x, &y)
    }

    /// Predict every row of a feature table
    pub fn predict_frame(&self, features: &DataFrame) -> EstimatorResult<Array1<f64>> {
        let x = frame::to_matrix(features, &self.feature_names)?;
        self.predict(&x)
    }

    /// Encode the fitted model
    pub fn to_bytes(&self) -> EstimatorResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a fitted model
    pub fn from_bytes(bytes: &[u8]) -> EstimatorResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl Regressor for ModelPipeline {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> EstimatorResult<()> {
        check_rows(x, y)?;
        if x.ncols() != self.feature_names.len() {
            return Err(EstimatorError::ShapeMismatch {
                expected: self.feature_names.len(),
                actual: x.ncols(),
            });
        }
        let z = self.scaler.fit_transform(x, y)?;
        let z = self.selector.fit_transform(&z, y)?;
        let z = self.poly.fit_transform(&z, y)?;
        self.ridge.fit(&z, y)?;
        debug!(
            rows = x.nrows(),
            selected = ?self.selector.selected(),
            terms = self.poly.n_output(),
            "Model pipeline fitted"
        );
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> EstimatorResult<Array1<f64>> {
        let z = self.scaler.transform(x)?;
        let z = self.selector.transform(&z)?;
        let z = self.poly.transform(&z)?;
        self.ridge.predict(&z)
    }
}
