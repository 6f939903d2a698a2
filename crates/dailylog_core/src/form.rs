//! Raw text input parsing for entry forms.
//!
//! # Responsibility
//! - Turn user-typed strings into a typed `EntryInput`.
//! - Report malformed values per field before they reach the store.
//!
//! # Invariants
//! - Dates must match `YYYY-MM-DD` exactly and name a real calendar day.
//! - Blank notes are stored as `None`.
//! - A successfully parsed form always passes `EntryInput::validate()`.

use crate::model::entry::{EntryInput, EntryValidationError, DATE_FORMAT};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

/// Field-level parse failure for form input.
#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    MissingField(&'static str),
    InvalidDate(String),
    InvalidNumber { field: &'static str, value: String },
    Validation(EntryValidationError),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidNumber { field, value } => {
                write!(f, "invalid number `{value}` for {field}")
            }
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntryValidationError> for FormError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Unparsed entry fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub date: String,
    pub sleep_hours: String,
    pub calories: String,
    pub hydration: String,
    pub running_mileage: String,
    pub notes: Option<String>,
}

impl EntryForm {
    /// Parses every field and validates metric ranges.
    ///
    /// # Errors
    /// - `MissingField` for blank required fields.
    /// - `InvalidDate`/`InvalidNumber` for malformed text.
    /// - `Validation` for negative or non-finite numbers.
    pub fn parse(&self) -> Result<EntryInput, FormError> {
        let input = EntryInput {
            date: parse_date(&self.date)?,
            sleep_hours: parse_real("sleep_hours", &self.sleep_hours)?,
            calories: parse_integer("calories", &self.calories)?,
            hydration: parse_real("hydration", &self.hydration)?,
            running_mileage: parse_real("running_mileage", &self.running_mileage)?,
            notes: normalize_notes(self.notes.as_deref()),
        };
        input.validate()?;
        Ok(input)
    }
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingField("date"));
    }
    if !DATE_RE.is_match(trimmed) {
        return Err(FormError::InvalidDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| FormError::InvalidDate(trimmed.to_string()))
}

fn parse_real(field: &'static str, value: &str) -> Result<f64, FormError> {
    let trimmed = required(field, value)?;
    trimmed.parse::<f64>().map_err(|_| FormError::InvalidNumber {
        field,
        value: trimmed.to_string(),
    })
}

fn parse_integer(field: &'static str, value: &str) -> Result<i64, FormError> {
    let trimmed = required(field, value)?;
    trimmed.parse::<i64>().map_err(|_| FormError::InvalidNumber {
        field,
        value: trimmed.to_string(),
    })
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(trimmed)
}

fn normalize_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
