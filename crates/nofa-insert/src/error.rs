//! Error types for the command-line adapter
//!
//! Feature errors are collected into [`AppError`] and sorted into three
//! kinds: input faults (the user must correct what they entered), lookup
//! faults (a referenced location, taxon or ecotype is absent) and
//! connectivity faults (the database could not be reached or refused the
//! write).

use std::path::PathBuf;
use thiserror::Error;

use crate::db::DbError;
use crate::features::locations::{LocationBatchError, ResolveLocationError, SearchLocationsError};
use crate::features::observations::{RecordObservationsError, SubmitObservationsError};

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Input,
    Lookup,
    Connectivity,
}

impl FaultKind {
    /// Process exit code reported for this kind of fault
    pub fn exit_code(self) -> i32 {
        match self {
            FaultKind::Connectivity => 1,
            FaultKind::Input => 2,
            FaultKind::Lookup => 3,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Resolve(#[from] ResolveLocationError),

    #[error(transparent)]
    Submit(#[from] SubmitObservationsError),

    #[error(transparent)]
    Record(#[from] RecordObservationsError),

    #[error(transparent)]
    Batch(#[from] LocationBatchError),

    #[error(transparent)]
    Search(#[from] SearchLocationsError),

    #[error(transparent)]
    Db(#[from] DbError),

    /// Database operation failed (SQLx)
    #[error("Database error: {0}. Check your database connection settings.")]
    Database(#[from] sqlx::Error),

    #[error("Failed to read submission file '{}': {source}", path.display())]
    SubmissionFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid submission file: {0}")]
    SubmissionParse(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn resolve_kind(err: &ResolveLocationError) -> FaultKind {
    match err {
        ResolveLocationError::Store(_) => FaultKind::Connectivity,
        e if e.is_input_fault() => FaultKind::Input,
        _ => FaultKind::Lookup,
    }
}

fn submit_kind(err: &SubmitObservationsError) -> FaultKind {
    match err {
        SubmitObservationsError::Invalid(_) => FaultKind::Input,
        SubmitObservationsError::TaxonNotFound { .. }
        | SubmitObservationsError::EcotypeNotFound { .. } => FaultKind::Lookup,
        SubmitObservationsError::Store { .. } => FaultKind::Connectivity,
    }
}

impl AppError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn kind(&self) -> FaultKind {
        match self {
            AppError::Resolve(e) => resolve_kind(e),
            AppError::Submit(e) => submit_kind(e),
            AppError::Record(e) => match e {
                RecordObservationsError::Invalid(_) => FaultKind::Input,
                RecordObservationsError::Location { source, .. } => resolve_kind(source),
                RecordObservationsError::Submit(e) => submit_kind(e),
            },
            AppError::Batch(_)
            | AppError::SubmissionFile { .. }
            | AppError::SubmissionParse(_)
            | AppError::InvalidArgument(_) => FaultKind::Input,
            AppError::Search(SearchLocationsError::InvalidLimit) => FaultKind::Input,
            AppError::Search(SearchLocationsError::Database(_))
            | AppError::Db(_)
            | AppError::Database(_)
            | AppError::Other(_) => FaultKind::Connectivity,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}
