//! Polynomial feature expansion

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::{EstimatorError, EstimatorResult, FeatureTransform, check_rows};

/// Expands columns into every monomial up to `degree`, bias column first,
/// then degree 1, degree 2, ... with each degree in lexicographic order of
/// column positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolynomialFeatures {
    degree: usize,
    terms: Option<Vec<Vec<usize>>>,
    n_input: Option<usize>,
}

impl PolynomialFeatures {
    /// Expansion up to `degree`
    #[must_use]
    pub const fn new(degree: usize) -> Self {
        Self {
            degree,
            terms: None,
            n_input: None,
        }
    }

    /// Number of output columns once fitted
    #[must_use]
    pub fn n_output(&self) -> Option<usize> {
        self.terms.as_ref().map(Vec::len)
    }
}

/// Column-index multisets for every monomial of `n` variables up to `degree`
pub(crate) fn monomials(n: usize, degree: usize) -> Vec<Vec<usize>> {
    let mut terms = vec![Vec::new()];
    let mut previous: Vec<Vec<usize>> = vec![Vec::new()];
    for _ in 0..degree {
        let mut next = Vec::new();
        for term in &previous {
            let start = term.last().copied().unwrap_or(0);
            for j in start..n {
                let mut extended = term.clone();
                extended.push(j);
                next.push(extended);
            }
        }
        terms.extend(next.iter().cloned());
        previous = next;
    }
    terms
}

impl FeatureTransform for PolynomialFeatures {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> EstimatorResult<()> {
        check_rows(x, y)?;
        if self.degree == 0 {
            return Err(EstimatorError::InvalidParameter("degree must be positive".into()));
        }
        self.terms = Some(monomials(x.ncols(), self.degree));
        self.n_input = Some(x.ncols());
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> EstimatorResult<Array2<f64>> {
        let (Some(terms), Some(n_input)) = (&self.terms, self.n_input) else {
            return Err(EstimatorError::NotFitted("PolynomialFeatures"));
        };
        if x.ncols() != n_input {
            return Err(EstimatorError::ShapeMismatch {
                expected: n_input,
                actual: x.ncols(),
            });
        }
        Ok(Array2::from_shape_fn((x.nrows(), terms.len()), |(i, t)| {
            terms[t].iter().map(|&j| x[[i, j]]).product::<f64>()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_degree_two_layout() {
        assert_eq!(
            monomials(2, 2),
            vec![vec![], vec![0], vec![1], vec![0, 0], vec![0, 1], vec![1, 1]]
        );
    }

    #[test]
    fn test_expands_rows() {
        let x = array![[2.0, 3.0]];
        let mut poly = PolynomialFeatures::new(2);
        let out = poly.fit_transform(&x, &array![0.0]).unwrap();
        assert_eq!(out, array![[1.0, 2.0, 3.0, 4.0, 6.0, 9.0]]);
    }

    #[test]
    fn test_output_width() {
        let mut poly = PolynomialFeatures::new(3);
        poly.fit(&Array2::zeros((1, 4)), &array![0.0]).unwrap();
        // C(4 + 3, 3)
        assert_eq!(poly.n_output(), Some(35));
    }
}
