//! Column subset selection

use frame::has_column;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::{TransformError, TransformResult, Transformer};

/// Keeps the requested columns that exist, in requested order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelector {
    columns: Vec<String>,
}

impl ColumnSelector {
    /// Selector over `columns`; an empty list is rejected
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> TransformResult<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(TransformError::InvalidConfig(
                "column selector needs at least one column".into(),
            ));
        }
        Ok(Self { columns })
    }

    /// Requested columns
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Transformer for ColumnSelector {
    fn fit(&mut self, _frame: &DataFrame, _target: Option<&[Option<f64>]>) -> TransformResult<()> {
        Ok(())
    }

    fn transform(&self, frame: &DataFrame) -> TransformResult<DataFrame> {
        let mut present: Vec<&str> = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            if has_column(frame, column) && !present.contains(&column.as_str()) {
                present.push(column);
            }
        }
        Ok(frame.select(present)?)
    }
}
