//! Shared validation utilities

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierValidationError {
    #[error("Location ID is required and cannot be empty")]
    Empty,

    #[error("'{0}' is not a valid location ID (expected a UUID)")]
    Malformed(String),
}

/// Parse a user-typed location id
///
/// Blank input is `Empty`; anything that is not a hyphenated, simple, or
/// braced UUID is `Malformed`.
pub fn parse_location_id(raw: Option<&str>) -> Result<Uuid, IdentifierValidationError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(IdentifierValidationError::Empty);
    }
    Uuid::parse_str(trimmed).map_err(|_| IdentifierValidationError::Malformed(trimmed.to_string()))
}

/// Whether an optional text value holds something
pub fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// `Err((start, end))` when both dates are set and `end` precedes `start`
pub fn check_date_order(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), (NaiveDate, NaiveDate)> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err((start, end)),
        _ => Ok(()),
    }
}
