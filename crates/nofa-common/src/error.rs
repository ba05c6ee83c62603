//! Error types shared across NOFA crates

use thiserror::Error;

/// Errors raised while parsing user-facing settings and codes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NofaError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),
}
