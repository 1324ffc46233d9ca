//! Mutual information between continuous variables
//!
//! Kraskov-Stögbauer-Grassberger k-nearest-neighbour estimator under the
//! max-norm. Both variables are divided by their standard deviation first,
//! so the joint-space neighbourhoods are not dominated by one axis.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use statrs::function::gamma::digamma;

use crate::scaler::column_scale;
use crate::{EstimatorError, EstimatorResult, check_rows};

/// Mutual information estimate of each column of `x` with `y`, in nats.
/// Never negative.
pub fn mutual_info_regression(
    x: &Array2<f64>,
    y: &Array1<f64>,
    n_neighbors: usize,
) -> EstimatorResult<Array1<f64>> {
    check_rows(x, y)?;
    if n_neighbors == 0 || n_neighbors >= x.nrows() {
        return Err(EstimatorError::InvalidParameter(format!(
            "n_neighbors must be in 1..{}, got {n_neighbors}",
            x.nrows()
        )));
    }

    let x = x / &column_scale(x);
    let y_std = y.std(0.0);
    let y = if y_std > 0.0 { y / y_std } else { y.clone() };

    Ok(x
        .axis_iter(Axis(1))
        .map(|column| mi_pair(column, y.view(), n_neighbors))
        .collect())
}

fn mi_pair(x: ArrayView1<f64>, y: ArrayView1<f64>, k: usize) -> f64 {
    let n = x.len();
    let mut joint = Vec::with_capacity(n - 1);
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;

    for i in 0..n {
        joint.clear();
        joint.extend(
            (0..n)
                .filter(|&j| j != i)
                .map(|j| (x[i] - x[j]).abs().max((y[i] - y[j]).abs())),
        );
        joint.select_nth_unstable_by(k - 1, f64::total_cmp);
        let radius = joint[k - 1];

        let nx = count_within(x, i, radius);
        let ny = count_within(y, i, radius);
        sum_x += digamma(nx as f64 + 1.0);
        sum_y += digamma(ny as f64 + 1.0);
    }

    let n_f = n as f64;
    let mi = digamma(n_f) + digamma(k as f64) - sum_x / n_f - sum_y / n_f;
    mi.max(0.0)
}

/// Other points strictly closer than `radius`; at radius zero, exact ties
fn count_within(v: ArrayView1<f64>, i: usize, radius: f64) -> usize {
    (0..v.len())
        .filter(|&j| j != i)
        .filter(|&j| {
            let d = (v[i] - v[j]).abs();
            d < radius || (radius == 0.0 && d == 0.0)
        })
        .count()
}
