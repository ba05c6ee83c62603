//! Comma-separated location batches
//!
//! Users paste several locations at once: a list of location ids, a list
//! of `x y [locality]` coordinate items sharing one CRS and mode, or a list
//! of legacy lake codes. Items are trimmed, repeats are dropped (first one
//! wins) and the input order is kept.

use nofa_common::OrderedSet;
use thiserror::Error;
use uuid::Uuid;

use super::types::{CoordinateMode, Crs, LocationInput};
use crate::features::shared::fields::FieldInput;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocationBatchError {
    #[error("No location entered")]
    NoLocation,

    #[error("'{0}' is not a valid location ID")]
    InvalidIdentifierText(String),

    #[error("'{0}' is not a valid coordinate pair (expected \"<x> <y> [name]\")")]
    InvalidCoordinateText(String),

    #[error("'{0}' is not a valid location code")]
    InvalidCodeText(String),
}

/// Non-empty, trimmed items of a comma-separated list
fn items(text: &str) -> Result<Vec<&str>, LocationBatchError> {
    let items: Vec<&str> = text
        .trim()
        .trim_matches(',')
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        return Err(LocationBatchError::NoLocation);
    }
    Ok(items)
}

/// Parse `"<uuid>, <uuid>, ..."`
pub fn parse_identifiers(text: &str) -> Result<Vec<LocationInput>, LocationBatchError> {
    let mut ids = OrderedSet::new();
    for item in items(text)? {
        let id = Uuid::parse_str(item)
            .map_err(|_| LocationBatchError::InvalidIdentifierText(item.to_string()))?;
        ids.insert(id);
    }

    Ok(ids
        .into_iter()
        .map(|id| LocationInput::identifier(id.to_string()))
        .collect())
}

/// Parse `"<x> <y> [locality words], ..."`; every item shares `crs` and `mode`
///
/// Decimal commas cannot be used here since the comma separates items.
pub fn parse_coordinates(
    text: &str,
    crs: Crs,
    mode: CoordinateMode,
) -> Result<Vec<LocationInput>, LocationBatchError> {
    let mut seen = OrderedSet::new();
    let mut inputs = Vec::new();

    for item in items(text)? {
        let invalid = || LocationBatchError::InvalidCoordinateText(item.to_string());

        let mut words = item.split_whitespace();
        let x = words.next().ok_or_else(invalid)?;
        let y = words.next().ok_or_else(invalid)?;
        let x = FieldInput::Decimal(x.to_string())
            .decimal()
            .ok()
            .flatten()
            .ok_or_else(invalid)?;
        let y = FieldInput::Decimal(y.to_string())
            .decimal()
            .ok()
            .flatten()
            .ok_or_else(invalid)?;

        let name = words.collect::<Vec<_>>().join(" ");
        let input = LocationInput::Coordinates {
            x: Some(x),
            y: Some(y),
            crs,
            mode,
            name: (!name.is_empty()).then_some(name),
        };

        if seen.insert(input.dedup_key()) {
            inputs.push(input);
        }
    }

    Ok(inputs)
}

/// Parse `"3067, 5616, ..."`
pub fn parse_legacy_codes(text: &str) -> Result<Vec<LocationInput>, LocationBatchError> {
    let mut codes = OrderedSet::new();
    for item in items(text)? {
        let code = item
            .parse::<i32>()
            .map_err(|_| LocationBatchError::InvalidCodeText(item.to_string()))?;
        codes.insert(code);
    }

    Ok(codes.into_iter().map(LocationInput::legacy_code).collect())
}
