//! Synthetic raw tables and temp workspaces
//!
//! The series are smooth functions of the month so every step has a signal to
//! learn. Monthly data starts in January 2014; the precipitation table starts
//! one month earlier and the bank table repeats its first period, so the
//! join and the de-duplication both have something to do.

use common::constants::{CITY_COLS, IMACEC_INDICE_COLS, PIB_COLS, SPANISH_MONTHS};
use rstest::fixture;
use serde_json::{Map, Value, json};
use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The shipped raw schema
pub const SCHEMA_TOML: &str = include_str!("../../../model/schema.toml");

/// Months generated by [`MilkWorkspace::new`]
pub const DEFAULT_MONTHS: usize = 48;

const FIRST_YEAR: i32 = 2014;

/// `(year, month)` of month offset `t` from January 2014
#[must_use]
pub fn period_at(t: i32) -> (i32, u32) {
    let year = FIRST_YEAR + t.div_euclid(12);
    let month = t.rem_euclid(12) as u32 + 1;
    (year, month)
}

fn season(month: u32, phase: usize) -> f64 {
    (2.0 * PI * (month as f64 + phase as f64) / 12.0).sin()
}

/// Integer with dots every three digits: `1234567` → `"1.234.567"`
#[must_use]
pub fn dotted(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Milk price at month offset `t`
#[must_use]
pub fn milk_price(t: i32) -> f64 {
    let (_, month) = period_at(t);
    200.0 + 1.5 * t as f64 + 8.0 * season(month, 0)
}

fn rain(t: i32, region: usize) -> f64 {
    let (_, month) = period_at(t);
    40.0 + 30.0 * season(month, region + 3) + region as f64
}

fn pib(t: i32, column: usize) -> u64 {
    let (_, month) = period_at(t);
    1_000_000 + 5_000 * t as u64 + 100_000 * column as u64 + 2_000 * u64::from(month % 3)
}

/// Index value at month offset `t`, between 90 and 110
#[must_use]
pub fn index_value(t: i32, column: usize) -> f64 {
    let (_, month) = period_at(t);
    90.0 + 0.3 * t as f64 + column as f64 + 0.5 * season(month, column)
}

/// Index value written the way the bank exports it
#[must_use]
pub fn index_text(t: i32, column: usize) -> String {
    dotted((index_value(t, column) * 1e6).round() as u64)
}

/// `precio_leche.csv` for `months` months
#[must_use]
pub fn milk_csv(months: usize) -> String {
    let mut out = String::from("Anio,Mes,Precio_leche\n");
    for t in 0..months as i32 {
        let (year, month) = period_at(t);
        let name = SPANISH_MONTHS[month as usize - 1].0;
        out.push_str(&format!("{year},{name},{:.2}\n", milk_price(t)));
    }
    out
}

/// `precipitaciones.csv`, starting one month before the milk table
#[must_use]
pub fn precipitation_csv(months: usize) -> String {
    let mut out = format!("date,{}\n", CITY_COLS.join(","));
    for t in -1..months as i32 {
        let (year, month) = period_at(t);
        let values: Vec<String> = (0..CITY_COLS.len()).map(|r| format!("{:.3}", rain(t, r))).collect();
        out.push_str(&format!("{year}-{month:02}-01,{}\n", values.join(",")));
    }
    out
}

fn bank_row(t: i32, pib_bump: u64) -> String {
    let (year, month) = period_at(t);
    let mut cells = vec![format!("{year}-{month:02}-01 00:00:00 UTC")];
    cells.extend((0..PIB_COLS.len()).map(|c| dotted(pib(t, c) + pib_bump)));
    cells.extend((0..IMACEC_INDICE_COLS.len()).map(|c| index_text(t, c)));
    cells.join(",")
}

/// `banco_central.csv`; the first period appears twice and the first copy
/// is the one that should survive
#[must_use]
pub fn bank_csv(months: usize) -> String {
    let mut out = format!("Periodo,{},{}\n", PIB_COLS.join(","), IMACEC_INDICE_COLS.join(","));
    for t in 0..months as i32 {
        out.push_str(&bank_row(t, 0));
        out.push('\n');
        if t == 0 {
            out.push_str(&bank_row(t, 777));
            out.push('\n');
        }
    }
    out
}

/// Rows shaped like the merged table, as the serving endpoint receives them:
/// numbers for prices and rain, bank text for PIB and index columns
#[must_use]
pub fn serving_records(months: std::ops::Range<i32>) -> Vec<Value> {
    months
        .map(|t| {
            let mut row = Map::new();
            row.insert("Precio_leche".into(), json!(milk_price(t)));
            for (r, name) in CITY_COLS.iter().enumerate() {
                row.insert((*name).into(), json!(rain(t, r)));
            }
            for (c, name) in PIB_COLS.iter().enumerate() {
                row.insert((*name).into(), json!(dotted(pib(t, c))));
            }
            for (c, name) in IMACEC_INDICE_COLS.iter().enumerate() {
                row.insert((*name).into(), json!(index_text(t, c)));
            }
            Value::Object(row)
        })
        .collect()
}

/// A temp directory laid out like a pipeline base path: raw tables under
/// `data/raw` and the schema under `model/`
pub struct MilkWorkspace {
    dir: TempDir,
}

impl MilkWorkspace {
    /// Workspace with [`DEFAULT_MONTHS`] of raw data
    #[must_use]
    pub fn new() -> Self {
        Self::with_months(DEFAULT_MONTHS)
    }

    /// Workspace with `months` of raw data
    #[must_use]
    pub fn with_months(months: usize) -> Self {
        let ws = Self::empty();
        ws.write("model/schema.toml", SCHEMA_TOML);
        ws.write_raw("precio_leche", &milk_csv(months));
        ws.write_raw("precipitaciones", &precipitation_csv(months));
        ws.write_raw("banco_central", &bank_csv(months));
        ws
    }

    /// Workspace with no files at all
    #[must_use]
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Base path
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `relative`
    #[must_use]
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a file under the workspace, creating parents
    pub fn write(&self, relative: impl AsRef<Path>, contents: &str) {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write file");
    }

    /// Replace a raw table
    pub fn write_raw(&self, stem: &str, contents: &str) {
        self.write(format!("data/raw/{stem}.csv"), contents);
    }
}

impl Default for MilkWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Workspace with the default raw data
#[fixture]
pub fn workspace() -> MilkWorkspace {
    MilkWorkspace::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dotted() {
        assert_eq!(dotted(7), "7");
        assert_eq!(dotted(999), "999");
        assert_eq!(dotted(1000), "1.000");
        assert_eq!(dotted(102_748_175), "102.748.175");
    }

    #[test]
    fn test_period_at_crosses_years() {
        assert_eq!(period_at(-1), (2013, 12));
        assert_eq!(period_at(0), (2014, 1));
        assert_eq!(period_at(13), (2015, 2));
    }

    #[test]
    fn test_bank_csv_repeats_first_period() {
        let csv = bank_csv(3);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("2014-01-01"));
        assert!(lines[2].starts_with("2014-01-01"));
    }
}
