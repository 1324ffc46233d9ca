//! Column standardization

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::{EstimatorError, EstimatorResult, FeatureTransform, check_rows};

/// Centers each column and divides by its population standard deviation.
/// Constant columns are divided by one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    /// Unfitted scaler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted column means
    #[must_use]
    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }
}

/// Population standard deviation per column, with zeros replaced by one
pub(crate) fn column_scale(x: &Array2<f64>) -> Array1<f64> {
    x.std_axis(Axis(0), 0.0)
        .mapv(|s| if s == 0.0 || !s.is_finite() { 1.0 } else { s })
}

impl FeatureTransform for StandardScaler {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> EstimatorResult<()> {
        check_rows(x, y)?;
        self.mean = x.mean_axis(Axis(0));
        self.scale = Some(column_scale(x));
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> EstimatorResult<Array2<f64>> {
        let (Some(mean), Some(scale)) = (&self.mean, &self.scale) else {
            return Err(EstimatorError::NotFitted("StandardScaler"));
        };
        if x.ncols() != mean.len() {
            return Err(EstimatorError::ShapeMismatch {
                expected: mean.len(),
                actual: x.ncols(),
            });
        }
        Ok((x - mean) / scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_standardizes_and_keeps_constant_columns_finite() {
        let x = array![[1.0, 5.0], [3.0, 5.0]];
        let y = array![0.0, 0.0];
        let mut scaler = StandardScaler::new();

        let z = scaler.fit_transform(&x, &y).unwrap();

        assert_eq!(z, array![[-1.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let err = StandardScaler::new().transform(&array![[1.0]]).unwrap_err();
        assert!(matches!(err, EstimatorError::NotFitted(_)));
    }
}
