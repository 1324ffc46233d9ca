//! Building frames from JSON row records

use polars::prelude::*;
use serde_json::Value;

use crate::error::{FrameError, FrameResult};

enum Cell {
    Missing,
    Num(f64),
    Text(String),
}

/// Build a frame from a list of JSON objects, one per row.
///
/// Columns appear in first-seen order. A column holding at least one JSON
/// string is text (numbers in it are kept as their literal); otherwise it is
/// `Float64`. `null` and absent keys are nulls.
pub fn from_records(records: &[Value]) -> FrameResult<DataFrame> {
    let mut names: Vec<String> = Vec::new();
    let mut cells: Vec<Vec<Cell>> = Vec::new();

    for (row, record) in records.iter().enumerate() {
        let object = record
            .as_object()
            .ok_or_else(|| FrameError::InvalidRecord(format!("row {row} is not a JSON object")))?;
        for (key, value) in object {
            let j = match names.iter().position(|n| n == key) {
                Some(j) => j,
                None => {
                    names.push(key.clone());
                    cells.push((0..row).map(|_| Cell::Missing).collect());
                    names.len() - 1
                }
            };
            let cell = match value {
                Value::Null => Cell::Missing,
                Value::Number(n) => n.as_f64().map_or(Cell::Missing, Cell::Num),
                Value::String(s) => Cell::Text(s.clone()),
                other => {
                    return Err(FrameError::InvalidRecord(format!(
                        "row {row}, column {key}: unsupported value {other}"
                    )));
                }
            };
            cells[j].push(cell);
        }
        for column in &mut cells {
            if column.len() == row {
                column.push(Cell::Missing);
            }
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, column)| build_column(&name, column))
        .collect();
    Ok(DataFrame::new(columns)?)
}

fn build_column(name: &str, cells: Vec<Cell>) -> Column {
    let textual = cells.iter().any(|c| matches!(c, Cell::Text(_)));
    if textual {
        let values: Vec<Option<String>> = cells
            .into_iter()
            .map(|c| match c {
                Cell::Missing => None,
                Cell::Num(x) => Some(format!("{x}")),
                Cell::Text(s) => Some(s),
            })
            .collect();
        Column::new(name.into(), values)
    } else {
        let values: Vec<Option<f64>> = cells
            .into_iter()
            .map(|c| match c {
                Cell::Num(x) => Some(x),
                _ => None,
            })
            .collect();
        Column::new(name.into(), values)
    }
}
