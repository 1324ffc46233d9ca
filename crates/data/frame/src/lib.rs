//! Polars helpers shared by the milk price crates
//!
//! Tables are plain [`polars::prelude::DataFrame`]s. This crate adds what the
//! batch steps and the inference service need on top: CSV reads with
//! per-column text overrides, frames built from JSON row records, and
//! null-checked conversion to `ndarray` matrices for the estimators.

#![forbid(unsafe_code)]

pub mod error;
pub mod io;
pub mod records;
pub mod table;

pub use error::{FrameError, FrameResult};
pub use io::{CsvOptions, read_csv, write_csv};
pub use records::from_records;
pub use table::{
    column_names, has_column, numeric, take_rows, text, to_matrix, to_vec,
};
