//! Form field values
//!
//! Submissions arrive from form-like front ends where every widget yields
//! text and "nothing chosen" is spelled with a placeholder. [`FieldInput`]
//! names the kind of field a value came from and extracts a typed value for
//! that kind. The serde helpers at the bottom apply the same extraction to
//! record fields, so `"<select>"` in a JSON submission reads as absent.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Shown by empty choice lists
pub const SELECT_PLACEHOLDER: &str = "<select>";

/// Filter value meaning "do not filter"
pub const ALL_PLACEHOLDER: &str = "<all>";

/// Date format used by the date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldValueError {
    #[error("'{value}' is not a whole number")]
    NotAnInteger { value: String },

    #[error("'{value}' is not a number")]
    NotADecimal { value: String },

    #[error("'{value}' is not a date (expected YYYY-MM-DD)")]
    NotADate { value: String },
}

/// One raw form value tagged by the kind of widget that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldInput {
    Text(String),
    MultiLine(String),
    Choice(String),
    Integer(String),
    Decimal(String),
    Date(String),
}

impl FieldInput {
    fn raw(&self) -> &str {
        match self {
            FieldInput::Text(v)
            | FieldInput::MultiLine(v)
            | FieldInput::Choice(v)
            | FieldInput::Integer(v)
            | FieldInput::Decimal(v)
            | FieldInput::Date(v) => v,
        }
    }

    /// Whether the field holds no user-supplied value
    pub fn is_blank(&self) -> bool {
        let raw = self.raw().trim();
        match self {
            FieldInput::Choice(_) => raw.is_empty() || is_placeholder(raw),
            _ => raw.is_empty(),
        }
    }

    /// Text content, or `None` when blank
    ///
    /// Single-line values are trimmed; multi-line values keep their inner
    /// layout and only lose surrounding whitespace.
    pub fn text(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        Some(self.raw().trim().to_string())
    }

    pub fn integer(&self) -> Result<Option<i64>, FieldValueError> {
        let Some(text) = self.text() else {
            return Ok(None);
        };
        text.parse()
            .map(Some)
            .map_err(|_| FieldValueError::NotAnInteger { value: text })
    }

    /// Decimal value; a comma decimal separator is accepted
    pub fn decimal(&self) -> Result<Option<f64>, FieldValueError> {
        let Some(text) = self.text() else {
            return Ok(None);
        };
        text.replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or(FieldValueError::NotADecimal { value: text })
    }

    pub fn date(&self) -> Result<Option<NaiveDate>, FieldValueError> {
        let Some(text) = self.text() else {
            return Ok(None);
        };
        NaiveDate::parse_from_str(&text, DATE_FORMAT)
            .map(Some)
            .map_err(|_| FieldValueError::NotADate { value: text })
    }
}

/// Whether `value` is one of the "nothing chosen" placeholders
pub fn is_placeholder(value: &str) -> bool {
    matches!(value.trim(), SELECT_PLACEHOLDER | ALL_PLACEHOLDER)
}

/// Normalise an optional filter value: blank and placeholders become `None`
pub fn filter_value(value: Option<&str>) -> Option<String> {
    value.and_then(|v| FieldInput::Choice(v.to_string()).text())
}

// ============================================================================
// Serde helpers
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    fn into_string(self) -> String {
        match self {
            RawValue::Int(v) => v.to_string(),
            RawValue::Float(v) => v.to_string(),
            RawValue::Text(v) => v,
        }
    }
}

fn raw<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawValue>::deserialize(deserializer)?.map(RawValue::into_string))
}

/// Free text; blank reads as `None`
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(raw(deserializer)?.and_then(|v| FieldInput::Text(v).text()))
}

/// Multi-line remarks; blank reads as `None`
pub fn multi_line<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(raw(deserializer)?.and_then(|v| FieldInput::MultiLine(v).text()))
}

/// Choice-list value; blank and placeholders read as `None`
pub fn choice<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(raw(deserializer)?.and_then(|v| FieldInput::Choice(v).text()))
}

pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let Some(value) = raw(deserializer)? else {
        return Ok(None);
    };
    let parsed = FieldInput::Integer(value.clone())
        .integer()
        .map_err(serde::de::Error::custom)?;
    parsed
        .map(i32::try_from)
        .transpose()
        .map_err(|_| serde::de::Error::custom(format!("'{value}' is out of range")))
}

pub fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match raw(deserializer)? {
        Some(v) => FieldInput::Decimal(v)
            .decimal()
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    match raw(deserializer)? {
        Some(v) => FieldInput::Date(v).date().map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
