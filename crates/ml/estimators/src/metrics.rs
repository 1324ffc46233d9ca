//! Regression metrics

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{EstimatorError, EstimatorResult};

/// Held-out evaluation record, persisted next to every model artifact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Root mean squared error
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
}

impl Metrics {
    /// Score predictions against the truth
    pub fn evaluate(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> EstimatorResult<Self> {
        Ok(Self {
            rmse: rmse(y_true, y_pred)?,
            r2: r2_score(y_true, y_pred)?,
        })
    }
}

fn check(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> EstimatorResult<()> {
    if y_true.is_empty() {
        return Err(EstimatorError::EmptyInput);
    }
    if y_true.len() != y_pred.len() {
        return Err(EstimatorError::ShapeMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    Ok(())
}

/// Square root of the mean squared error
pub fn rmse(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> EstimatorResult<f64> {
    check(y_true, y_pred)?;
    let mse = (y_true - y_pred).mapv(|e| e * e).sum() / y_true.len() as f64;
    Ok(mse.sqrt())
}

/// Coefficient of determination. A constant target scores 1 when predicted
/// exactly and 0 otherwise.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> EstimatorResult<f64> {
    check(y_true, y_pred)?;
    let mean = y_true.sum() / y_true.len() as f64;
    let ss_res = (y_true - y_pred).mapv(|e| e * e).sum();
    let ss_tot = y_true.mapv(|v| (v - mean) * (v - mean)).sum();
    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}
