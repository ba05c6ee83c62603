//! Observation records
//!
//! Values shared by every event of one submission, and the occurrence rows
//! cloned against each resolved location. All text fields go through the
//! form-field normalisation in [`crate::features::shared::fields`], so blank
//! values and choice placeholders arrive here as `None`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::features::shared::fields;

/// Event values shared by all locations of a submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFields {
    #[serde(default, deserialize_with = "fields::choice")]
    pub sampling_protocol: Option<String>,
    #[serde(default, deserialize_with = "fields::choice")]
    pub sample_size_unit: Option<String>,
    #[serde(default, deserialize_with = "fields::decimal")]
    pub sample_size_value: Option<f64>,
    #[serde(default, deserialize_with = "fields::integer")]
    pub sampling_effort: Option<i32>,
    #[serde(default, deserialize_with = "fields::date")]
    pub date_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "fields::date")]
    pub date_end: Option<NaiveDate>,
    #[serde(default, deserialize_with = "fields::text")]
    pub field_number: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub recorded_by: Option<String>,
    #[serde(default, deserialize_with = "fields::multi_line")]
    pub event_remarks: Option<String>,
    #[serde(default, deserialize_with = "fields::choice")]
    pub reliability: Option<String>,
}

/// Dataset, project and reference the events belong to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataIds {
    #[serde(default, deserialize_with = "fields::choice")]
    pub dataset_id: Option<String>,
    #[serde(default, deserialize_with = "fields::choice")]
    pub project_id: Option<String>,
    #[serde(default, deserialize_with = "fields::integer")]
    pub reference_id: Option<i32>,
}

/// One row of the occurrence table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceRow {
    /// Scientific name
    #[serde(default, deserialize_with = "fields::choice")]
    pub taxon: Option<String>,
    /// Vernacular name of the ecotype
    #[serde(default, deserialize_with = "fields::choice")]
    pub ecotype: Option<String>,
    #[serde(default, deserialize_with = "fields::choice")]
    pub organism_quantity_type: Option<String>,
    #[serde(default, deserialize_with = "fields::decimal")]
    pub organism_quantity: Option<f64>,
    #[serde(default, deserialize_with = "fields::choice")]
    pub occurrence_status: Option<String>,
    #[serde(default, deserialize_with = "fields::choice")]
    pub population_trend: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub record_number: Option<String>,
    #[serde(default, deserialize_with = "fields::multi_line")]
    pub occurrence_remarks: Option<String>,
    #[serde(default, deserialize_with = "fields::choice")]
    pub establishment_means: Option<String>,
    #[serde(default, deserialize_with = "fields::multi_line")]
    pub establishment_remarks: Option<String>,
    #[serde(default, deserialize_with = "fields::choice")]
    pub spawning_condition: Option<String>,
    #[serde(default, deserialize_with = "fields::choice")]
    pub spawning_location: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub verified_by: Option<String>,
    #[serde(default, deserialize_with = "fields::date")]
    pub verified_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventField {
    SamplingProtocol,
    DateEnd,
    RecordedBy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    Dataset,
    Project,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceField {
    Taxon,
    OccurrenceStatus,
    EstablishmentMeans,
}

/// Points at the form field or table cell a fault refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum FieldRef {
    Event { field: EventField },
    Metadata { field: MetadataField },
    /// `row` is zero-based
    Occurrence { row: usize, field: OccurrenceField },
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Event { field } => {
                let name = match field {
                    EventField::SamplingProtocol => "sampling protocol",
                    EventField::DateEnd => "end date",
                    EventField::RecordedBy => "recorded by",
                };
                write!(f, "event {name}")
            },
            FieldRef::Metadata { field } => match field {
                MetadataField::Dataset => write!(f, "dataset"),
                MetadataField::Project => write!(f, "project"),
            },
            FieldRef::Occurrence { row, field } => {
                let name = match field {
                    OccurrenceField::Taxon => "taxon",
                    OccurrenceField::OccurrenceStatus => "occurrence status",
                    OccurrenceField::EstablishmentMeans => "establishment means",
                };
                write!(f, "occurrence row {}: {name}", row + 1)
            },
        }
    }
}
