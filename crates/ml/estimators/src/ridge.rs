//! L2-regularized linear regression

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::{EstimatorError, EstimatorResult, Regressor, check_rows};

/// Ridge regression with an unpenalized intercept
///
/// Fits by centering `x` and `y` and solving `(XᵀX + αI) w = Xᵀy` with a
/// Cholesky factorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ridge {
    alpha: f64,
    coef: Option<Array1<f64>>,
    intercept: f64,
}

impl Ridge {
    /// Unfitted model with regularization strength `alpha`
    #[must_use]
    pub const fn new(alpha: f64) -> Self {
        Self {
            alpha,
            coef: None,
            intercept: 0.0,
        }
    }

    /// Model with known coefficients
    #[must_use]
    pub fn from_coefficients(coef: Array1<f64>, intercept: f64) -> Self {
        Self {
            alpha: 0.0,
            coef: Some(coef),
            intercept,
        }
    }

    /// Regularization strength
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fitted weights
    #[must_use]
    pub fn coef(&self) -> Option<&Array1<f64>> {
        self.coef.as_ref()
    }

    /// Fitted intercept
    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Regressor for Ridge {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> EstimatorResult<()> {
        check_rows(x, y)?;
        if self.alpha.is_nan() || self.alpha < 0.0 {
            return Err(EstimatorError::InvalidParameter(format!(
                "alpha must be non-negative, got {}",
                self.alpha
            )));
        }

        let x_mean = x.mean_axis(Axis(0)).ok_or(EstimatorError::EmptyInput)?;
        let y_mean = y.mean().ok_or(EstimatorError::EmptyInput)?;
        let xc = x - &x_mean;
        let yc = y - y_mean;

        let mut gram = xc.t().dot(&xc);
        for i in 0..gram.nrows() {
            gram[[i, i]] += self.alpha;
        }
        let rhs = xc.t().dot(&yc);
        let coef = cholesky_solve(gram, rhs)?;

        self.intercept = y_mean - x_mean.dot(&coef);
        self.coef = Some(coef);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> EstimatorResult<Array1<f64>> {
        let coef = self.coef.as_ref().ok_or(EstimatorError::NotFitted("Ridge"))?;
        if x.ncols() != coef.len() {
            return Err(EstimatorError::ShapeMismatch {
                expected: coef.len(),
                actual: x.ncols(),
            });
        }
        Ok(x.dot(coef) + self.intercept)
    }
}

/// Solve `a x = b` for symmetric positive definite `a`
fn cholesky_solve(a: Array2<f64>, b: Array1<f64>) -> EstimatorResult<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        let mut diag = a[[j, j]];
        for k in 0..j {
            diag -= l[[j, k]] * l[[j, k]];
        }
        if diag.is_nan() || diag <= 0.0 {
            return Err(EstimatorError::Singular);
        }
        let ljj = diag.sqrt();
        l[[j, j]] = ljj;
        for i in (j + 1)..n {
            let mut v = a[[i, j]];
            for k in 0..j {
                v -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = v / ljj;
        }
    }

    // L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut v = b[i];
        for k in 0..i {
            v -= l[[i, k]] * z[k];
        }
        z[i] = v / l[[i, i]];
    }
    // Lᵀ x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut v = z[i];
        for k in (i + 1)..n {
            v -= l[[k, i]] * x[k];
        }
        x[i] = v / l[[i, i]];
    }
    Ok(x)
}
