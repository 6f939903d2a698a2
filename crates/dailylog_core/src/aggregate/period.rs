//! Grouping granularity and period-key derivation.
//!
//! # Invariants
//! - Day, month and year keys sort lexicographically in chronological order.
//! - Week keys use Sunday-first numbering (`%U`) with the date's calendar
//!   year, so a week spanning New Year yields two keys
//!   (`2024-12-31` -> `2024-W52`, `2025-01-01` -> `2025-W00`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Period size used to bucket entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [Self::Day, Self::Week, Self::Month, Self::Year];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Derives the bucket label for `date`.
    pub fn period_key(self, date: NaiveDate) -> String {
        let pattern = match self {
            Self::Day => "%Y-%m-%d",
            Self::Week => "%Y-W%U",
            Self::Month => "%Y-%m",
            Self::Year => "%Y",
        };
        date.format(pattern).to_string()
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping value outside `day|week|month|year`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidGranularity(pub String);

impl Display for InvalidGranularity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported granularity `{}`; expected day|week|month|year",
            self.0
        )
    }
}

impl Error for InvalidGranularity {}

impl FromStr for Granularity {
    type Err = InvalidGranularity;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(InvalidGranularity(value.to_string())),
        }
    }
}
