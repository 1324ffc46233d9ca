//! Core types for the milk price pipeline

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{BANK_FILE_NAME, MILK_FILE_NAME, PREP_FILE_NAME, SPANISH_MONTHS};

/// A (year, month) time bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1-based
    pub month: u32,
}

impl Period {
    /// Create a period, rejecting months outside 1..=12
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month >= 1 && month <= 12 {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Build a period from a date
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse a `%Y-%m-%d` date, ignoring anything after the first ten
    /// characters (bank timestamps carry a time and zone suffix)
    #[must_use]
    pub fn parse_date_prefix(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let head = trimmed.get(..10)?;
        NaiveDate::parse_from_str(head, "%Y-%m-%d")
            .ok()
            .map(Self::from_date)
    }

    /// The period immediately before this one
    #[must_use]
    pub const fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

/// Map a Spanish month abbreviation (`Ene` .. `Dic`) to its number
#[must_use]
pub fn spanish_month(abbrev: &str) -> Option<u32> {
    let abbrev = abbrev.trim();
    SPANISH_MONTHS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(abbrev))
        .map(|(_, month)| *month)
}

/// The three raw data sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Monthly milk price paid to producers
    Milk,
    /// Monthly precipitation per region
    Precipitation,
    /// Central bank activity indicators
    Bank,
}

impl Source {
    /// All sources, in collection order
    pub const ALL: [Self; 3] = [Self::Milk, Self::Precipitation, Self::Bank];

    /// File stem of the raw CSV and of the schema table
    #[must_use]
    pub const fn file_stem(&self) -> &'static str {
        match self {
            Self::Milk => MILK_FILE_NAME,
            Self::Precipitation => PREP_FILE_NAME,
            Self::Bank => BANK_FILE_NAME,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}
