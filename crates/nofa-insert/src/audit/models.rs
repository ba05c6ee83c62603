//! Audit log models

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// History Query Constants
// ============================================================================

/// Default number of history rows returned per query
pub const DEFAULT_HISTORY_LIMIT: i64 = 100;

/// Upper bound on history rows returned by one query
pub const MAX_HISTORY_LIMIT: i64 = 1000;

/// Who wrote a row, and whether it was a test submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub username: String,
    #[serde(default)]
    pub test: bool,
}

impl AuditStamp {
    pub fn new(username: impl Into<String>, test: bool) -> Self {
        Self {
            username: username.into(),
            test,
        }
    }
}

/// Entity kinds with a log table in the `plugin` schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditKind {
    Location,
    Event,
    Occurrence,
    Dataset,
    Project,
    Reference,
}

impl AuditKind {
    pub const ALL: [AuditKind; 6] = [
        Self::Location,
        Self::Event,
        Self::Occurrence,
        Self::Dataset,
        Self::Project,
        Self::Reference,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Event => "event",
            Self::Occurrence => "occurrence",
            Self::Dataset => "dataset",
            Self::Project => "project",
            Self::Reference => "reference",
        }
    }

    /// Qualified log table name
    pub fn table(&self) -> &'static str {
        match self {
            Self::Location => "plugin.location_log",
            Self::Event => "plugin.event_log",
            Self::Occurrence => "plugin.occurrence_log",
            Self::Dataset => "plugin.dataset_log",
            Self::Project => "plugin.project_log",
            Self::Reference => "plugin.reference_log",
        }
    }

    /// Column holding the logged entity's id
    pub fn id_column(&self) -> &'static str {
        match self {
            Self::Location => "location_id",
            Self::Event => "event_id",
            Self::Occurrence => "occurrence_id",
            Self::Dataset => "dataset_id",
            Self::Project => "project_id",
            Self::Reference => "reference_id",
        }
    }
}

/// Optional history columns, in output order
pub const HISTORY_LINK_COLUMNS: [&str; 6] = [
    "location_name",
    "event_id",
    "location_id",
    "dataset_id",
    "project_id",
    "reference_id",
];

impl AuditKind {
    /// Columns of this log, besides its own id, that name related rows
    pub fn linked_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Location => &["location_name"],
            Self::Event => &["location_id", "dataset_id", "project_id", "reference_id"],
            Self::Occurrence => &[
                "event_id",
                "location_id",
                "dataset_id",
                "project_id",
                "reference_id",
            ],
            Self::Dataset | Self::Project | Self::Reference => &[],
        }
    }
}

impl std::fmt::Display for AuditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| format!("Unknown log kind: {s}"))
    }
}

/// Location log row
#[derive(Debug, Clone, PartialEq)]
pub struct LocationLogEntry {
    pub location_id: Uuid,
    pub location_name: Option<String>,
}

/// Event log row
#[derive(Debug, Clone, PartialEq)]
pub struct EventLogEntry {
    pub event_id: Uuid,
    pub location_id: Uuid,
    pub dataset_id: String,
    pub project_id: String,
    pub reference_id: Option<i32>,
}

/// Occurrence log row
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceLogEntry {
    pub occurrence_id: Uuid,
    pub event_id: Uuid,
    pub location_id: Uuid,
    pub dataset_id: String,
    pub project_id: String,
    pub reference_id: Option<i32>,
}

/// Filters for browsing a log table
///
/// Every filter is optional. Date bounds are inclusive and compare the
/// calendar date of the timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub kind: AuditKind,
    /// SQL `LIKE` pattern matched against the username
    pub username: Option<String>,
    pub inserted_from: Option<NaiveDate>,
    pub inserted_to: Option<NaiveDate>,
    pub updated_from: Option<NaiveDate>,
    pub updated_to: Option<NaiveDate>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_HISTORY_LIMIT
}

impl HistoryQuery {
    pub fn new(kind: AuditKind) -> Self {
        Self {
            kind,
            username: None,
            inserted_from: None,
            inserted_to: None,
            updated_from: None,
            updated_to: None,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn username(mut self, pattern: impl Into<String>) -> Self {
        self.username = Some(pattern.into());
        self
    }

    pub fn inserted_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.inserted_from = from;
        self.inserted_to = to;
        self
    }

    pub fn updated_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.updated_from = from;
        self.updated_to = to;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }
}

/// One row of any log table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistoryEntry {
    pub entity_id: String,
    pub username: String,
    pub test: Option<bool>,
    pub insert_timestamp: Option<NaiveDateTime>,
    pub update_timestamp: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
}

impl HistoryEntry {
    /// Related ids present on this row, labelled by column
    pub fn links(&self) -> Vec<(&'static str, &str)> {
        let values = [
            &self.location_name,
            &self.event_id,
            &self.location_id,
            &self.dataset_id,
            &self.project_id,
            &self.reference_id,
        ];
        HISTORY_LINK_COLUMNS
            .into_iter()
            .zip(values)
            .filter_map(|(column, value)| value.as_deref().map(|v| (column, v)))
            .collect()
    }
}
