//! Typed column access and matrix conversion

use ndarray::Array2;
use polars::prelude::*;

use crate::error::{FrameError, FrameResult};

/// Column names in order
#[must_use]
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|n| n.to_string()).collect()
}

/// Whether a column exists
#[must_use]
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

fn column<'a>(df: &'a DataFrame, name: &str) -> FrameResult<&'a Column> {
    df.column(name)
        .map_err(|_| FrameError::ColumnNotFound(name.to_string()))
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Null
    )
}

/// Cells of a numeric column as `f64`; nulls and NaN are `None`
pub fn numeric(df: &DataFrame, name: &str) -> FrameResult<Vec<Option<f64>>> {
    let col = column(df, name)?;
    if !is_numeric(col.dtype()) {
        return Err(FrameError::TypeMismatch {
            column: name.to_string(),
            expected: "numeric",
        });
    }
    let values = col.cast(&DataType::Float64)?;
    Ok(values
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Cells of a text column
pub fn text(df: &DataFrame, name: &str) -> FrameResult<Vec<Option<String>>> {
    let col = column(df, name)?;
    let cells = col.str().map_err(|_| FrameError::TypeMismatch {
        column: name.to_string(),
        expected: "text",
    })?;
    Ok(cells.into_iter().map(|v| v.map(str::to_string)).collect())
}

/// Present values of a numeric column; any missing cell is an error
pub fn to_vec(df: &DataFrame, name: &str) -> FrameResult<Vec<f64>> {
    numeric(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| FrameError::MissingValue {
                column: name.to_string(),
                row,
            })
        })
        .collect()
}

/// Dense matrix of the listed numeric columns, in that order
pub fn to_matrix<S: AsRef<str>>(df: &DataFrame, names: &[S]) -> FrameResult<Array2<f64>> {
    let mut matrix = Array2::zeros((df.height(), names.len()));
    for (j, name) in names.iter().enumerate() {
        for (i, value) in to_vec(df, name.as_ref())?.into_iter().enumerate() {
            matrix[[i, j]] = value;
        }
    }
    Ok(matrix)
}

/// Rows at the given positions, in that order
pub fn take_rows(df: &DataFrame, rows: &[usize]) -> FrameResult<DataFrame> {
    let idx = IdxCa::from_vec("rows".into(), rows.iter().map(|&r| r as IdxSize).collect());
    Ok(df.take(&idx)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn periods() -> DataFrame {
        df!(
            "anio" => [2020i32, 2020, 2019],
            "mes" => [2i32, 1, 12],
            "v" => [Some(3.0), None, Some(f64::NAN)],
            "label" => ["a", "b", "c"]
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_casts_and_masks_nan() {
        let df = periods();
        assert_eq!(numeric(&df, "anio").unwrap(), vec![Some(2020.0), Some(2020.0), Some(2019.0)]);
        assert_eq!(numeric(&df, "v").unwrap(), vec![Some(3.0), None, None]);
    }

    #[test]
    fn test_type_and_presence_errors() {
        let df = periods();
        assert!(matches!(
            numeric(&df, "label").unwrap_err(),
            FrameError::TypeMismatch { expected: "numeric", .. }
        ));
        assert!(matches!(text(&df, "mes").unwrap_err(), FrameError::TypeMismatch { .. }));
        assert!(matches!(numeric(&df, "nope").unwrap_err(), FrameError::ColumnNotFound(_)));
    }

    #[test]
    fn test_to_matrix_reports_missing() {
        let err = to_matrix(&periods(), &["anio", "v"]).unwrap_err();
        assert!(matches!(err, FrameError::MissingValue { row: 1, .. }));
    }

    #[test]
    fn test_to_matrix_follows_requested_order() {
        let matrix = to_matrix(&periods(), &["mes", "anio"]).unwrap();
        assert_eq!(matrix.row(0).to_vec(), vec![2.0, 2020.0]);
        assert_eq!(matrix.shape(), &[3, 2]);
    }

    #[test]
    fn test_take_rows_reorders() {
        let taken = take_rows(&periods(), &[2, 0]).unwrap();
        assert_eq!(text(&taken, "label").unwrap(), vec![Some("c".into()), Some("a".into())]);
    }
}
