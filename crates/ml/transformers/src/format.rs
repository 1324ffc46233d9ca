//! Repair of locale-formatted numeric text
//!
//! The central bank export writes integers with `.` as a thousands separator
//! and index values with `.` in arbitrary positions. Both are fixed here by
//! turning the text column into a `Float64` one.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{TransformResult, Transformer};

/// How a text cell is read back as a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatKind {
    /// Strip every `.` and read an integer: `"1.012.143"` is `1012143`
    ThousandsInteger,
    /// Strip every `.` and read an index in `[10, 200)`: the integer part has
    /// three digits when the digit string starts with `1`, otherwise two
    IndexDecimal,
}

impl FormatKind {
    /// Parse one cell; `None` when the text does not fit the format
    #[must_use]
    pub fn parse(self, raw: &str) -> Option<f64> {
        let digits: String = raw.trim().chars().filter(|&c| c != '.').collect();
        match self {
            Self::ThousandsInteger => digits.parse::<i64>().ok().map(|v| v as f64),
            Self::IndexDecimal => {
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let int_len = if digits.starts_with('1') { 3 } else { 2 };
                if digits.len() < int_len {
                    return None;
                }
                let (int_part, frac_part) = digits.split_at(int_len);
                if frac_part.is_empty() {
                    int_part.parse().ok()
                } else {
                    format!("{int_part}.{frac_part}").parse().ok()
                }
            }
        }
    }
}

/// Converts named text columns to numbers using a [`FormatKind`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatFixer {
    columns: Vec<String>,
    kind: FormatKind,
}

impl FormatFixer {
    /// Fixer for `columns`
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>, kind: FormatKind) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            kind,
        }
    }

    /// Columns this fixer touches
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Transformer for FormatFixer {
    fn fit(&mut self, _frame: &DataFrame, _target: Option<&[Option<f64>]>) -> TransformResult<()> {
        Ok(())
    }

    fn transform(&self, frame: &DataFrame) -> TransformResult<DataFrame> {
        let mut out = frame.clone();
        for name in &self.columns {
            // Numeric or absent columns pass through
            let Ok(cells) = frame.column(name).and_then(|c| c.str()) else {
                continue;
            };

            let mut malformed = 0usize;
            let fixed: Float64Chunked = cells
                .into_iter()
                .map(|cell| {
                    let parsed = self.kind.parse(cell?);
                    if parsed.is_none() {
                        malformed += 1;
                    }
                    parsed
                })
                .collect();

            if malformed > 0 {
                warn!(column = %name, malformed, "Malformed numeric text replaced with missing values");
            }
            debug!(column = %name, kind = ?self.kind, "Fixed number format");
            out.with_column(fixed.with_name(name.as_str().into()).into_series())?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame::{numeric, to_vec};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_thousands_integer() {
        let fixer = FormatFixer::new(["PIB"], FormatKind::ThousandsInteger);
        let frame = df!("PIB" => ["2.3", "1111.333"]).unwrap();

        let out = fixer.transform(&frame).unwrap();

        assert_eq!(to_vec(&out, "PIB").unwrap(), vec![23.0, 1_111_333.0]);
    }

    #[test]
    fn test_index_decimal_rule() {
        let kind = FormatKind::IndexDecimal;
        assert_eq!(kind.parse("102.748.175"), Some(102.748175));
        assert_eq!(kind.parse("89.706.438"), Some(89.706438));
        assert_eq!(kind.parse("10.274.817"), Some(102.74817));
        assert_eq!(kind.parse("95"), Some(95.0));
    }

    #[test]
    fn test_malformed_cells_become_missing() {
        let fixer = FormatFixer::new(["Imacec_industria"], FormatKind::IndexDecimal);
        let frame =
            df!("Imacec_industria" => [Some("9a.1"), None, Some("1"), Some("97.5")]).unwrap();

        let out = fixer.transform(&frame).unwrap();

        assert_eq!(
            numeric(&out, "Imacec_industria").unwrap(),
            vec![None, None, None, Some(97.5)]
        );
    }

    #[test]
    fn test_numeric_column_passes_through() {
        let fixer = FormatFixer::new(["PIB", "absent"], FormatKind::ThousandsInteger);
        let frame = df!("PIB" => [1.5]).unwrap();

        assert!(fixer.transform(&frame).unwrap().equals_missing(&frame));
    }
}
