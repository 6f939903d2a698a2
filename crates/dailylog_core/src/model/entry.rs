//! Daily entry domain model.
//!
//! # Responsibility
//! - Define the canonical per-day metrics record.
//! - Validate metric ranges before any persistence or aggregation.
//!
//! # Invariants
//! - `id` is stable and never reused for another entry.
//! - Numeric metrics are finite and non-negative.
//! - `date` year lies in `1..=9999`, so `YYYY-MM-DD` text sorts chronologically.
//!
//! # See also
//! - DESIGN.md (Entry Store)

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one daily entry.
pub type EntryId = Uuid;

/// Text form of entry dates in storage, input and day period keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lowest calendar year accepted for an entry date.
pub const MIN_ENTRY_YEAR: i32 = 1;
/// Highest calendar year accepted for an entry date.
pub const MAX_ENTRY_YEAR: i32 = 9999;

/// Names one numeric metric column, used in validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SleepHours,
    Calories,
    Hydration,
    RunningMileage,
}

impl Metric {
    /// Column/field name for this metric.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SleepHours => "sleep_hours",
            Self::Calories => "calories",
            Self::Hydration => "hydration",
            Self::RunningMileage => "running_mileage",
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for entry data.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValidationError {
    NilId,
    NegativeMetric { metric: Metric, value: f64 },
    NonFiniteMetric { metric: Metric },
    DateOutOfRange(NaiveDate),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "entry id must not be nil"),
            Self::NegativeMetric { metric, value } => {
                write!(f, "{metric} must be non-negative, got {value}")
            }
            Self::NonFiniteMetric { metric } => write!(f, "{metric} must be a finite number"),
            Self::DateOutOfRange(date) => write!(
                f,
                "entry date {date} is outside supported years {MIN_ENTRY_YEAR}..={MAX_ENTRY_YEAR}"
            ),
        }
    }
}

impl Error for EntryValidationError {}

/// Caller-supplied field set for creating or overwriting an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryInput {
    pub date: NaiveDate,
    /// Hours slept.
    pub sleep_hours: f64,
    pub calories: i64,
    /// Liters.
    pub hydration: f64,
    /// Unit is caller convention (miles or km).
    pub running_mileage: f64,
    pub notes: Option<String>,
}

impl EntryInput {
    /// Checks metric ranges and date bounds.
    ///
    /// # Errors
    /// - `NegativeMetric` for any metric below zero.
    /// - `NonFiniteMetric` for NaN or infinite real values.
    /// - `DateOutOfRange` for years outside `1..=9999`.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if !(MIN_ENTRY_YEAR..=MAX_ENTRY_YEAR).contains(&self.date.year()) {
            return Err(EntryValidationError::DateOutOfRange(self.date));
        }

        check_real(Metric::SleepHours, self.sleep_hours)?;
        if self.calories < 0 {
            return Err(EntryValidationError::NegativeMetric {
                metric: Metric::Calories,
                value: self.calories as f64,
            });
        }
        check_real(Metric::Hydration, self.hydration)?;
        check_real(Metric::RunningMileage, self.running_mileage)?;
        Ok(())
    }
}

fn check_real(metric: Metric, value: f64) -> Result<(), EntryValidationError> {
    if !value.is_finite() {
        return Err(EntryValidationError::NonFiniteMetric { metric });
    }
    if value < 0.0 {
        return Err(EntryValidationError::NegativeMetric { metric, value });
    }
    Ok(())
}

/// One persisted daily metrics record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EntryWire")]
pub struct Entry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub sleep_hours: f64,
    pub calories: i64,
    pub hydration: f64,
    pub running_mileage: f64,
    pub notes: Option<String>,
}

impl Entry {
    /// Creates a new entry with a generated stable ID.
    ///
    /// # Errors
    /// - Returns validation errors from [`EntryInput::validate`].
    pub fn new(input: EntryInput) -> Result<Self, EntryValidationError> {
        Self::with_id(Uuid::new_v4(), input)
    }

    /// Creates an entry with a caller-provided ID.
    ///
    /// # Errors
    /// - `NilId` when `id` is the nil UUID.
    /// - Any validation error from the input fields.
    pub fn with_id(id: EntryId, input: EntryInput) -> Result<Self, EntryValidationError> {
        let entry = Self {
            id,
            date: input.date,
            sleep_hours: input.sleep_hours,
            calories: input.calories,
            hydration: input.hydration,
            running_mileage: input.running_mileage,
            notes: input.notes,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Validates identity and field ranges.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.id.is_nil() {
            return Err(EntryValidationError::NilId);
        }
        self.to_input().validate()
    }

    /// Returns the mutable field set of this entry.
    pub fn to_input(&self) -> EntryInput {
        EntryInput {
            date: self.date,
            sleep_hours: self.sleep_hours,
            calories: self.calories,
            hydration: self.hydration,
            running_mileage: self.running_mileage,
            notes: self.notes.clone(),
        }
    }

    /// Returns whether this entry carries the same field values as `input`.
    pub fn matches_input(&self, input: &EntryInput) -> bool {
        self.to_input() == *input
    }
}

#[derive(Deserialize)]
struct EntryWire {
    id: EntryId,
    date: NaiveDate,
    sleep_hours: f64,
    calories: i64,
    hydration: f64,
    running_mileage: f64,
    notes: Option<String>,
}

impl TryFrom<EntryWire> for Entry {
    type Error = EntryValidationError;

    fn try_from(value: EntryWire) -> Result<Self, Self::Error> {
        Entry::with_id(
            value.id,
            EntryInput {
                date: value.date,
                sleep_hours: value.sleep_hours,
                calories: value.calories,
                hydration: value.hydration,
                running_mileage: value.running_mileage,
                notes: value.notes,
            },
        )
    }
}
