//! `nofa-insert record` command implementation
//!
//! A submission file holds everything the insert form collects:
//!
//! ```json
//! {
//!   "locations": [
//!     {"method": "legacy_code", "code": 3067},
//!     {"method": "coordinates", "x": 601404.85, "y": 6644928.24,
//!      "crs": "UTM32", "mode": "create_new", "name": "Hovinbk"}
//!   ],
//!   "event": {"sampling_protocol": "electrofishing", "date_end": "2017-06-02",
//!             "recorded_by": "Kari Nordmann"},
//!   "metadata": {"dataset_id": "nofa-2017", "project_id": "12"},
//!   "occurrences": [{"taxon": "Salmo trutta", "occurrence_status": "present",
//!                    "establishment_means": "native"}],
//!   "taxonomic_coverage": ["Salmo trutta", "Esox lucius"]
//! }
//! ```

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::print_json;
use crate::audit::AuditStamp;
use crate::config::Config;
use crate::db;
use crate::error::{AppError, Result};
use crate::features::locations::LocationInput;
use crate::features::observations::commands::record;
use crate::features::observations::{
    EventFields, MetadataIds, OccurrenceRow, RecordObservationsCommand,
};
use crate::store::PgStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub locations: Vec<LocationInput>,
    #[serde(default)]
    pub event: EventFields,
    #[serde(default)]
    pub metadata: MetadataIds,
    #[serde(default)]
    pub occurrences: Vec<OccurrenceRow>,
    #[serde(default)]
    pub taxonomic_coverage: Vec<String>,
}

impl Submission {
    pub fn into_command(self, stamp: AuditStamp) -> RecordObservationsCommand {
        RecordObservationsCommand {
            locations: self.locations,
            event: self.event,
            metadata: self.metadata,
            occurrences: self.occurrences,
            taxonomic_coverage: self.taxonomic_coverage,
            stamp,
        }
    }
}

pub fn load_submission(path: &Path) -> Result<Submission> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::SubmissionFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

pub async fn run(config: &Config, file: &Path, dry_run: bool, json: bool) -> Result<()> {
    let command = load_submission(file)?.into_command(config.audit_stamp());
    command.validate()?;

    if dry_run {
        println!(
            "{} Submission is complete: {} location(s), {} occurrence row(s)",
            "✓".green(),
            command.locations.len(),
            command.occurrences.len()
        );
        return Ok(());
    }

    let pool = db::connect(config).await?;
    let store = PgStore::new(pool);
    let response = record::handle(&store, &config.resolver_settings(), command).await?;

    if json {
        return print_json(&response);
    }

    println!("{}", "Observations recorded:".cyan().bold());
    for event in &response.events {
        println!(
            "  location {}  event {}  ({} occurrence(s))",
            event.location_id,
            event.event_id,
            event.occurrence_ids.len()
        );
    }
    Ok(())
}
