//! Trailing window statistics

use frame::{has_column, numeric};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{TransformError, TransformResult, Transformer};

/// Statistic computed over each trailing window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollingStat {
    /// Arithmetic mean
    Mean,
    /// Sample standard deviation (ddof 1)
    Std,
}

impl RollingStat {
    /// Resolve a statistic name; anything but `mean` or `std` is unsupported
    pub fn from_name(name: &str) -> TransformResult<Self> {
        match name {
            "mean" => Ok(Self::Mean),
            "std" => Ok(Self::Std),
            other => Err(TransformError::Unsupported(format!(
                "rolling statistic '{other}'"
            ))),
        }
    }

    /// Name used in output column suffixes
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Std => "std",
        }
    }

    fn apply(self, window: &[f64]) -> Option<f64> {
        let n = window.len();
        if n == 0 {
            return None;
        }
        let mean = window.iter().sum::<f64>() / n as f64;
        match self {
            Self::Mean => Some(mean),
            Self::Std => {
                if n < 2 {
                    return None;
                }
                let ss: f64 = window.iter().map(|v| (v - mean).powi(2)).sum();
                Some((ss / (n - 1) as f64).sqrt())
            }
        }
    }
}

/// Appends `<column>_rolling<window>_<stat>` for each requested column present
///
/// Windows trail the current row, hold at most `window_size` rows and need at
/// least one observed value. Missing cells inside a window are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingAggregator {
    columns: Vec<String>,
    method: String,
    window_size: usize,
}

impl RollingAggregator {
    /// Aggregator computing `method` over `columns`
    pub fn new<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        method: impl Into<String>,
        window_size: usize,
    ) -> TransformResult<Self> {
        if window_size == 0 {
            return Err(TransformError::InvalidConfig(
                "rolling window must hold at least one row".into(),
            ));
        }
        Ok(Self {
            columns: columns.into_iter().map(Into::into).collect(),
            method: method.into(),
            window_size,
        })
    }

    /// Columns aggregated
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Trailing window size
    #[must_use]
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    /// Output column name for `column`
    #[must_use]
    pub fn output_name(&self, column: &str) -> String {
        format!("{column}_rolling{}_{}", self.window_size, self.method)
    }
}

impl Transformer for RollingAggregator {
    fn fit(&mut self, _frame: &DataFrame, _target: Option<&[Option<f64>]>) -> TransformResult<()> {
        Ok(())
    }

    fn transform(&self, frame: &DataFrame) -> TransformResult<DataFrame> {
        let stat = RollingStat::from_name(&self.method)?;
        let mut out = frame.clone();

        for name in self.columns.iter().filter(|c| has_column(frame, c)) {
            let values = numeric(frame, name).map_err(|_| TransformError::NotNumeric(name.clone()))?;
            let aggregated = rolling(&values, self.window_size, stat);
            out.with_column(Column::new(self.output_name(name).into(), aggregated))?;
        }

        debug!(
            stat = stat.name(),
            window = self.window_size,
            columns = self.columns.len(),
            "Applied rolling aggregation"
        );
        Ok(out)
    }
}

fn rolling(values: &[Option<f64>], window_size: usize, stat: RollingStat) -> Vec<Option<f64>> {
    let mut window = Vec::with_capacity(window_size);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window_size);
            window.clear();
            window.extend(values[start..=i].iter().flatten().filter(|v| !v.is_nan()));
            stat.apply(&window)
        })
        .collect()
}
