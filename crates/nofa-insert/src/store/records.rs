//! Rows written by the insert workflow

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::audit::{AuditStamp, EventLogEntry, LocationLogEntry, OccurrenceLogEntry};
use crate::features::locations::types::Point;
use crate::features::observations::types::{EventFields, MetadataIds, OccurrenceRow};

/// A new `nofa.location` row; `point` is already in `srid`
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub location_id: Uuid,
    pub point: Point,
    pub srid: i32,
    pub location_type: String,
    pub verbatim_locality: Option<String>,
}

impl NewLocation {
    pub fn log_entry(&self) -> LocationLogEntry {
        LocationLogEntry {
            location_id: self.location_id,
            location_name: self.verbatim_locality.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestLocation {
    pub location_id: Uuid,
    pub distance: f64,
}

/// A new `nofa.event` row
///
/// `dataset_id` and `project_id` are required by the time an event is
/// built; `MetadataIds` keeps them optional only until validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub event_id: Uuid,
    pub location_id: Uuid,
    pub fields: EventFields,
    pub dataset_id: String,
    pub project_id: String,
    pub reference_id: Option<i32>,
}

impl NewEvent {
    pub fn new(location_id: Uuid, fields: EventFields, metadata: &MetadataIds) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            location_id,
            fields,
            dataset_id: metadata.dataset_id.clone().unwrap_or_default(),
            project_id: metadata.project_id.clone().unwrap_or_default(),
            reference_id: metadata.reference_id,
        }
    }

    pub fn log_entry(&self) -> EventLogEntry {
        EventLogEntry {
            event_id: self.event_id,
            location_id: self.location_id,
            dataset_id: self.dataset_id.clone(),
            project_id: self.project_id.clone(),
            reference_id: self.reference_id,
        }
    }
}

/// A new `nofa.occurrence` row with resolved lookup ids
#[derive(Debug, Clone, PartialEq)]
pub struct NewOccurrence {
    pub occurrence_id: Uuid,
    pub event_id: Uuid,
    pub taxon_id: i32,
    pub ecotype_id: Option<i32>,
    pub row: OccurrenceRow,
    pub modified: NaiveDateTime,
}

impl NewOccurrence {
    pub fn log_entry(&self, event: &NewEvent) -> OccurrenceLogEntry {
        OccurrenceLogEntry {
            occurrence_id: self.occurrence_id,
            event_id: self.event_id,
            location_id: event.location_id,
            dataset_id: event.dataset_id.clone(),
            project_id: event.project_id.clone(),
            reference_id: event.reference_id,
        }
    }
}

/// Everything written for one location of a submission
#[derive(Debug, Clone, PartialEq)]
pub struct EventBatch {
    pub event: NewEvent,
    /// Taxa in scope for the event (`nofa."samplingTaxaRange"`)
    pub coverage_taxon_ids: Vec<i32>,
    pub occurrences: Vec<NewOccurrence>,
    pub stamp: AuditStamp,
}
