//! Observations
//!
//! Events, occurrences and taxonomic coverage written against resolved
//! locations.

pub mod commands;
pub mod types;
pub mod validation;

pub use commands::{
    RecordObservationsCommand, RecordObservationsError, RecordObservationsResponse,
    SubmitObservationsCommand, SubmitObservationsError, SubmitObservationsResponse, WrittenEvent,
};
pub use types::{EventFields, FieldRef, MetadataIds, OccurrenceRow};
pub use validation::ObservationValidationError;
