//! Shared utilities for feature modules
//!
//! - **fields**: form field kinds and placeholder handling
//! - **validation**: input validation helpers
//! - **test_helpers**: in-memory store and fixtures (test-only)

pub mod fields;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use fields::{FieldInput, FieldValueError};
pub use validation::{parse_location_id, IdentifierValidationError};
