//! Record observations command
//!
//! The full insert workflow: check every mandatory field and the shape of
//! every location input, drop repeated inputs, resolve the rest to location
//! ids and submit the observations against them.

use nofa_common::OrderedSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::submit::{self, SubmitObservationsCommand, SubmitObservationsError, WrittenEvent};
use crate::audit::AuditStamp;
use crate::features::locations::commands::resolve::{
    self, ResolveLocationCommand, ResolveLocationError, ResolveLocationResponse,
};
use crate::features::locations::types::{LocationInput, ResolverSettings};
use crate::features::observations::types::{EventFields, MetadataIds, OccurrenceRow};
use crate::features::observations::validation::{check_submission, ObservationValidationError};
use crate::store::NofaStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordObservationsCommand {
    pub locations: Vec<LocationInput>,
    pub event: EventFields,
    pub metadata: MetadataIds,
    #[serde(default)]
    pub occurrences: Vec<OccurrenceRow>,
    #[serde(default)]
    pub taxonomic_coverage: Vec<String>,
    pub stamp: AuditStamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordObservationsResponse {
    /// One entry per distinct location input
    pub locations: Vec<ResolveLocationResponse>,
    pub events: Vec<WrittenEvent>,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordObservationsError {
    #[error(transparent)]
    Invalid(#[from] ObservationValidationError),

    /// `index` is the zero-based position in the submitted location list
    #[error("Location {row}: {source}", row = .index + 1)]
    Location {
        index: usize,
        #[source]
        source: ResolveLocationError,
    },

    #[error(transparent)]
    Submit(#[from] SubmitObservationsError),
}

impl RecordObservationsCommand {
    /// Every check that can run without storage
    pub fn validate(&self) -> Result<(), RecordObservationsError> {
        check_submission(
            self.locations.len(),
            &self.event,
            &self.metadata,
            &self.occurrences,
        )?;

        for (index, input) in self.locations.iter().enumerate() {
            self.resolve_command(input)
                .validate()
                .map_err(|source| RecordObservationsError::Location { index, source })?;
        }
        Ok(())
    }

    fn resolve_command(&self, input: &LocationInput) -> ResolveLocationCommand {
        ResolveLocationCommand::new(input.clone(), self.stamp.clone())
    }

    /// Inputs with repeats removed, paired with their first position
    fn distinct_locations(&self) -> Vec<(usize, &LocationInput)> {
        let mut seen = OrderedSet::new();
        self.locations
            .iter()
            .enumerate()
            .filter(|(_, input)| seen.insert(input.dedup_key()))
            .collect()
    }
}

/// Handler for the complete insert workflow
#[tracing::instrument(
    skip(store, settings, command),
    fields(
        locations = command.locations.len(),
        occurrences = command.occurrences.len(),
        username = %command.stamp.username,
    )
)]
pub async fn handle<S: NofaStore + ?Sized>(
    store: &S,
    settings: &ResolverSettings,
    command: RecordObservationsCommand,
) -> Result<RecordObservationsResponse, RecordObservationsError> {
    command.validate()?;

    let distinct = command.distinct_locations();
    if distinct.len() < command.locations.len() {
        tracing::debug!(
            dropped = command.locations.len() - distinct.len(),
            "Repeated location inputs dropped"
        );
    }

    let mut resolved = Vec::with_capacity(distinct.len());
    let mut location_ids: OrderedSet<Uuid> = OrderedSet::new();
    for (index, input) in distinct {
        let response = resolve::handle(store, settings, command.resolve_command(input))
            .await
            .map_err(|source| RecordObservationsError::Location { index, source })?;
        location_ids.insert(response.location_id);
        resolved.push(response);
    }

    let submitted = submit::handle(
        store,
        SubmitObservationsCommand {
            location_ids: location_ids.into_vec(),
            event: command.event,
            metadata: command.metadata,
            occurrences: command.occurrences,
            taxonomic_coverage: command.taxonomic_coverage,
            stamp: command.stamp,
        },
    )
    .await?;

    tracing::info!(
        events = submitted.events.len(),
        occurrences = submitted.occurrence_count(),
        "Observations recorded"
    );
    Ok(RecordObservationsResponse {
        locations: resolved,
        events: submitted.events,
    })
}
