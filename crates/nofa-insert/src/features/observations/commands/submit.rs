//! Submit observations command
//!
//! Writes one event per resolved location, cloning the same occurrence rows
//! under each event. Each location's event, taxonomic coverage links,
//! occurrences and their log rows are written in one transaction; a lookup
//! or store fault at a later location leaves the earlier ones committed.

use chrono::Utc;
use nofa_common::OrderedSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::AuditStamp;
use crate::features::observations::types::{EventFields, MetadataIds, OccurrenceRow};
use crate::features::observations::validation::{check_submission, ObservationValidationError};
use crate::store::{EventBatch, NewEvent, NewOccurrence, NofaStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitObservationsCommand {
    /// Resolved location ids, in submission order
    pub location_ids: Vec<Uuid>,
    pub event: EventFields,
    pub metadata: MetadataIds,
    #[serde(default)]
    pub occurrences: Vec<OccurrenceRow>,
    /// Scientific names of the taxa the sampling covered
    #[serde(default)]
    pub taxonomic_coverage: Vec<String>,
    pub stamp: AuditStamp,
}

/// Ids written for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrittenEvent {
    pub location_id: Uuid,
    pub event_id: Uuid,
    pub occurrence_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitObservationsResponse {
    pub events: Vec<WrittenEvent>,
}

impl SubmitObservationsResponse {
    pub fn occurrence_count(&self) -> usize {
        self.events.iter().map(|e| e.occurrence_ids.len()).sum()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitObservationsError {
    #[error(transparent)]
    Invalid(#[from] ObservationValidationError),

    #[error("Taxon '{name}' not found ({committed_events} event(s) already committed)")]
    TaxonNotFound {
        name: String,
        committed_events: usize,
    },

    #[error("Ecotype '{name}' not found ({committed_events} event(s) already committed)")]
    EcotypeNotFound {
        name: String,
        committed_events: usize,
    },

    #[error("{source} ({committed_events} event(s) already committed)")]
    Store {
        committed_events: usize,
        #[source]
        source: StoreError,
    },
}

impl SubmitObservationsError {
    /// Events written before the failure, if any were attempted
    pub fn committed_events(&self) -> usize {
        match self {
            Self::Invalid(_) => 0,
            Self::TaxonNotFound { committed_events, .. }
            | Self::EcotypeNotFound { committed_events, .. }
            | Self::Store { committed_events, .. } => *committed_events,
        }
    }
}

impl SubmitObservationsCommand {
    pub fn validate(&self) -> Result<(), SubmitObservationsError> {
        check_submission(
            self.location_ids.len(),
            &self.event,
            &self.metadata,
            &self.occurrences,
        )?;
        Ok(())
    }
}

/// Handler for submitting observations against resolved locations
#[tracing::instrument(
    skip(store, command),
    fields(
        locations = command.location_ids.len(),
        occurrences = command.occurrences.len(),
        username = %command.stamp.username,
    )
)]
pub async fn handle<S: NofaStore + ?Sized>(
    store: &S,
    command: SubmitObservationsCommand,
) -> Result<SubmitObservationsResponse, SubmitObservationsError> {
    command.validate()?;

    let modified = Utc::now().naive_utc();
    let mut events: Vec<WrittenEvent> = Vec::with_capacity(command.location_ids.len());

    for &location_id in &command.location_ids {
        let committed_events = events.len();
        let store_failed = |source: StoreError| SubmitObservationsError::Store {
            committed_events,
            source,
        };
        let event = NewEvent::new(location_id, command.event.clone(), &command.metadata);

        let mut coverage: OrderedSet<i32> = OrderedSet::new();
        for name in &command.taxonomic_coverage {
            let taxon_id = store.taxon_id(name).await.map_err(store_failed)?.ok_or_else(|| {
                SubmitObservationsError::TaxonNotFound {
                    name: name.clone(),
                    committed_events,
                }
            });
            coverage.insert(abort_on_lookup(taxon_id, committed_events)?);
        }

        let mut occurrences = Vec::with_capacity(command.occurrences.len());
        for row in &command.occurrences {
            let name = row.taxon.as_deref().unwrap_or_default();
            let taxon_id = store.taxon_id(name).await.map_err(store_failed)?.ok_or_else(|| {
                SubmitObservationsError::TaxonNotFound {
                    name: name.to_string(),
                    committed_events,
                }
            });
            let taxon_id = abort_on_lookup(taxon_id, committed_events)?;

            let ecotype_id = match &row.ecotype {
                Some(ecotype) => {
                    let ecotype_id = store
                        .ecotype_id(ecotype)
                        .await
                        .map_err(store_failed)?
                        .ok_or_else(|| SubmitObservationsError::EcotypeNotFound {
                            name: ecotype.clone(),
                            committed_events,
                        });
                    Some(abort_on_lookup(ecotype_id, committed_events)?)
                },
                None => None,
            };

            occurrences.push(NewOccurrence {
                occurrence_id: Uuid::new_v4(),
                event_id: event.event_id,
                taxon_id,
                ecotype_id,
                row: row.clone(),
                modified,
            });
        }

        let batch = EventBatch {
            event,
            coverage_taxon_ids: coverage.into_vec(),
            occurrences,
            stamp: command.stamp.clone(),
        };
        if let Err(err) = store.write_event(&batch).await {
            tracing::warn!(committed_events, error = %err, "Event write failed");
            return Err(store_failed(err));
        }

        tracing::info!(
            %location_id,
            event_id = %batch.event.event_id,
            occurrences = batch.occurrences.len(),
            "Event written"
        );
        events.push(WrittenEvent {
            location_id,
            event_id: batch.event.event_id,
            occurrence_ids: batch
                .occurrences
                .iter()
                .map(|o| o.occurrence_id)
                .collect(),
        });
    }

    Ok(SubmitObservationsResponse { events })
}

fn abort_on_lookup<T>(
    result: Result<T, SubmitObservationsError>,
    committed_events: usize,
) -> Result<T, SubmitObservationsError> {
    if let Err(err) = &result {
        tracing::warn!(committed_events, error = %err, "Submission aborted");
    }
    result
}
