//! Mandatory-field checks run before any observation is written

use chrono::NaiveDate;
use thiserror::Error;

use super::types::{
    EventField, EventFields, FieldRef, MetadataField, MetadataIds, OccurrenceField, OccurrenceRow,
};
use crate::features::shared::validation::{check_date_order, is_present};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObservationValidationError {
    #[error("At least one location is required")]
    NoLocations,

    #[error("Mandatory field missing: {0}")]
    MandatoryFieldMissing(FieldRef),

    #[error("End date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// Check a submission, reporting the first problem found
///
/// Order: locations, event fields, metadata, occurrence rows in table
/// order, then the date range.
pub fn check_submission(
    location_count: usize,
    event: &EventFields,
    metadata: &MetadataIds,
    occurrences: &[OccurrenceRow],
) -> Result<(), ObservationValidationError> {
    if location_count == 0 {
        return Err(ObservationValidationError::NoLocations);
    }

    let missing = |field| Err(ObservationValidationError::MandatoryFieldMissing(field));

    let event_fields = [
        (EventField::SamplingProtocol, is_present(event.sampling_protocol.as_deref())),
        (EventField::DateEnd, event.date_end.is_some()),
        (EventField::RecordedBy, is_present(event.recorded_by.as_deref())),
    ];
    for (field, present) in event_fields {
        if !present {
            return missing(FieldRef::Event { field });
        }
    }

    let metadata_fields = [
        (MetadataField::Dataset, is_present(metadata.dataset_id.as_deref())),
        (MetadataField::Project, is_present(metadata.project_id.as_deref())),
    ];
    for (field, present) in metadata_fields {
        if !present {
            return missing(FieldRef::Metadata { field });
        }
    }

    for (row, occurrence) in occurrences.iter().enumerate() {
        let row_fields = [
            (OccurrenceField::Taxon, occurrence.taxon.as_deref()),
            (OccurrenceField::OccurrenceStatus, occurrence.occurrence_status.as_deref()),
            (OccurrenceField::EstablishmentMeans, occurrence.establishment_means.as_deref()),
        ];
        for (field, value) in row_fields {
            if !is_present(value) {
                return missing(FieldRef::Occurrence { row, field });
            }
        }
    }

    check_date_order(event.date_start, event.date_end)
        .map_err(|(start, end)| ObservationValidationError::InvalidDateRange { start, end })
}
