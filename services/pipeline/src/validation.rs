//! Raw asset validation against the declarative schema
//!
//! The schema is a TOML file with one table per raw source, keyed by file
//! stem, and one entry per column:
//!
//! ```toml
//! [precio_leche.Mes]
//! type = "string"
//! allowed = ["Ene", "Feb", "Mar"]
//! ```
//!
//! Every violation across every source is collected before failing. Columns
//! present in a file but absent from the schema are not checked.

use frame::CsvOptions;
use polars::prelude::DataFrame;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::artifacts::{read_table, require};
use crate::context::StepContext;
use crate::error::{PipelineError, PipelineResult, RuleViolation};

/// Cell type a column must hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Whole numbers
    Integer,
    /// Floating point numbers
    Float,
    /// Any number
    Number,
    /// Any text
    String,
}

const fn default_required() -> bool {
    true
}

/// Rules for one column
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnRule {
    /// Cell type
    #[serde(rename = "type")]
    pub kind: ColumnType,
    /// Column must be present
    #[serde(default = "default_required")]
    pub required: bool,
    /// Empty cells allowed
    #[serde(default)]
    pub nullable: bool,
    /// Inclusive lower bound for numeric types
    pub min: Option<f64>,
    /// Inclusive upper bound for numeric types
    pub max: Option<f64>,
    /// Closed set of accepted literals
    pub allowed: Option<Vec<String>>,
    /// Pattern the whole cell must match
    pub regex: Option<String>,
}

/// Column rules per raw source
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    tables: BTreeMap<String, BTreeMap<String, ColumnRule>>,
}

impl Schema {
    /// Parse schema TOML
    pub fn parse(text: &str) -> PipelineResult<Self> {
        toml::from_str(text).map_err(|e| PipelineError::Schema(e.to_string()))
    }

    /// Load a schema file that must exist
    pub fn load(path: &Path) -> PipelineResult<Self> {
        require(path)?;
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Source names in the schema
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Check one raw table; every cell is read as its literal text
    pub fn check(&self, source: &str, frame: &DataFrame) -> PipelineResult<Vec<RuleViolation>> {
        let Some(columns) = self.tables.get(source) else {
            return Err(PipelineError::Schema(format!("no rules for source {source}")));
        };
        let mut violations = Vec::new();
        for (name, rule) in columns {
            let violation = |row: Option<usize>, kind: &str, message: String| RuleViolation {
                source: source.to_string(),
                column: name.clone(),
                row,
                rule: kind.to_string(),
                message,
            };

            let Ok(column) = frame.column(name) else {
                if rule.required {
                    violations.push(violation(None, "required", "required column is missing".into()));
                }
                continue;
            };

            let pattern = rule
                .regex
                .as_deref()
                .map(|p| Regex::new(&format!("^(?:{p})$")))
                .transpose()
                .map_err(|e| PipelineError::Schema(format!("{source}.{name}: {e}")))?;

            let cells = column
                .str()
                .map_err(|_| PipelineError::Schema(format!("{source}.{name}: cells were not read as text")))?;
            for (row, cell) in cells.into_iter().enumerate() {
                let cell = cell.unwrap_or_default();
                if cell.is_empty() {
                    if !rule.nullable {
                        violations.push(violation(Some(row), "nullable", "null value not allowed".into()));
                    }
                    continue;
                }
                if let Some((rule_name, message)) = check_cell(rule, pattern.as_ref(), cell) {
                    violations.push(violation(Some(row), rule_name, message));
                }
            }
        }
        debug!(source, violations = violations.len(), "Checked source");
        Ok(violations)
    }
}

fn check_cell(rule: &ColumnRule, pattern: Option<&Regex>, cell: &str) -> Option<(&'static str, String)> {
    let number = match rule.kind {
        ColumnType::String => None,
        ColumnType::Integer => match cell.parse::<i64>() {
            Ok(v) => Some(v as f64),
            Err(_) => return Some(("type", format!("'{cell}' is not an integer"))),
        },
        ColumnType::Float | ColumnType::Number => match cell.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => return Some(("type", format!("'{cell}' is not a number"))),
        },
    };

    if let Some(v) = number {
        if let Some(min) = rule.min.filter(|&min| v < min) {
            return Some(("min", format!("{v} is below {min}")));
        }
        if let Some(max) = rule.max.filter(|&max| v > max) {
            return Some(("max", format!("{v} is above {max}")));
        }
    }
    if let Some(allowed) = &rule.allowed {
        if !allowed.iter().any(|a| a == cell) {
            return Some(("allowed", format!("'{cell}' is not an allowed value")));
        }
    }
    if let Some(re) = pattern {
        if !re.is_match(cell) {
            return Some(("regex", format!("'{cell}' does not match {}", re.as_str())));
        }
    }
    None
}

/// Validate every raw file named in the schema. Fails with the aggregated
/// violations; returns the number of sources checked otherwise.
pub fn validate_assets(ctx: &StepContext) -> PipelineResult<usize> {
    ctx.banner("validation");
    let schema = Schema::load(&ctx.layout.schema_file())?;

    let mut violations = Vec::new();
    let mut checked = 0;
    for source in schema.sources() {
        let path = ctx.layout.raw_dir().join(format!("{source}.csv"));
        let frame = read_table(&path, &CsvOptions::all_text())?;
        violations.extend(schema.check(source, &frame)?);
        checked += 1;
    }

    if !violations.is_empty() {
        return Err(PipelineError::Validation(violations));
    }
    info!(sources = checked, "All raw assets match the schema");
    Ok(checked)
}
