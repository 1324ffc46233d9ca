//! CSV reading and writing

use polars::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::error::FrameResult;

/// Options controlling CSV type inference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvOptions {
    /// Columns kept as text even when every cell parses as a number
    pub text_columns: Vec<String>,
    /// Skip inference and keep every column as text
    pub all_text: bool,
}

impl CsvOptions {
    /// Force the given columns to stay textual
    #[must_use]
    pub fn with_text_columns<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            text_columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            all_text: false,
        }
    }

    /// Keep every cell exactly as written
    #[must_use]
    pub fn all_text() -> Self {
        Self {
            text_columns: Vec::new(),
            all_text: true,
        }
    }

    fn read_options(&self) -> CsvReadOptions {
        let read = CsvReadOptions::default().with_has_header(true);
        if self.all_text {
            // No rows inspected: every column is read as String
            return read.with_infer_schema_length(Some(0));
        }
        if self.text_columns.is_empty() {
            return read;
        }
        let overrides: Schema = self
            .text_columns
            .iter()
            .map(|name| Field::new(name.as_str().into(), DataType::String))
            .collect();
        read.with_schema_overwrite(Some(Arc::new(overrides)))
    }
}

/// Read a CSV file with a header row. Empty cells are nulls.
pub fn read_csv(path: impl AsRef<Path>, options: &CsvOptions) -> FrameResult<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let df = options
        .read_options()
        .into_reader_with_file_handle(file)
        .finish()?;
    debug!(
        "Read {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Write a frame as CSV with a header row, creating parent directories
pub fn write_csv(df: &DataFrame, path: impl AsRef<Path>) -> FrameResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    write_csv_to(df, File::create(path)?)?;
    debug!(
        "Wrote {} rows x {} columns to {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(())
}

/// Write CSV to any writer
pub fn write_csv_to<W: Write>(df: &DataFrame, writer: W) -> FrameResult<()> {
    let mut out = df.clone();
    CsvWriter::new(writer)
        .include_header(true)
        .finish(&mut out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{numeric, text};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn read_str(data: &str, options: &CsvOptions) -> DataFrame {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, data).unwrap();
        read_csv(&path, options).unwrap()
    }

    #[test]
    fn test_infers_numeric_and_text() {
        let df = read_str("a,b\n1,x\n2.5,y\n", &CsvOptions::default());

        assert_eq!(numeric(&df, "a").unwrap(), vec![Some(1.0), Some(2.5)]);
        assert_eq!(text(&df, "b").unwrap(), vec![Some("x".to_string()), Some("y".to_string())]);
    }

    #[test]
    fn test_forced_text_column() {
        let options = CsvOptions::with_text_columns(&["pib"]);
        let df = read_str("pib,v\n1.234,1\n5.678,2\n", &options);

        assert_eq!(text(&df, "pib").unwrap()[0].as_deref(), Some("1.234"));
        assert_eq!(numeric(&df, "v").unwrap(), vec![Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_all_text_keeps_literals() {
        let df = read_str("a,b\n1.50,\n", &CsvOptions::all_text());

        assert_eq!(text(&df, "a").unwrap(), vec![Some("1.50".to_string())]);
        assert_eq!(text(&df, "b").unwrap(), vec![None]);
    }

    #[test]
    fn test_write_then_read_is_stable() {
        let options = CsvOptions::with_text_columns(&["b"]);
        let df = read_str("a,b\n1.5,89.706.438\n0.1,\n", &options);

        let mut first = Vec::new();
        write_csv_to(&df, &mut first).unwrap();
        let again = read_str(std::str::from_utf8(&first).unwrap(), &options);
        let mut second = Vec::new();
        write_csv_to(&again, &mut second).unwrap();

        assert_eq!(String::from_utf8(first.clone()).unwrap(), "a,b\n1.5,89.706.438\n0.1,\n");
        assert_eq!(first, second);
    }
}
