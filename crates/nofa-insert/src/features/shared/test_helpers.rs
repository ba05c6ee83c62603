//! Test doubles and fixtures
//!
//! [`MemoryStore`] implements [`NofaStore`] over in-memory tables and
//! records every write, so handler tests can assert exactly which rows a
//! submission produced.
//!
//! ```rust,ignore
//! let store = MemoryStore::new()
//!     .with_location(LOCATION_A, Point::new(601404.0, 6644928.0))
//!     .with_taxon("Salmo salar", 1);
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::audit::{AuditStamp, EventLogEntry, LocationLogEntry, OccurrenceLogEntry};
use crate::features::locations::types::Point;
use crate::features::observations::types::{EventFields, MetadataIds, OccurrenceRow};
use crate::store::{
    EventBatch, NearestLocation, NewEvent, NewLocation, NewOccurrence, NofaStore, StoreError,
};

pub const LOCATION_A: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);
pub const LOCATION_B: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);
pub const LOCATION_C: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0003);

#[derive(Debug, Clone)]
pub struct StoredLocation {
    pub location_id: Uuid,
    pub point: Point,
    pub legacy_code: Option<i32>,
}

#[derive(Debug, Default)]
pub struct MemoryState {
    pub locations: Vec<StoredLocation>,
    pub taxa: HashMap<String, i32>,
    pub ecotypes: HashMap<String, i32>,
    /// Per (from, to) SRID pair, an offset added by `transform_point`
    pub transforms: HashMap<(i32, i32), (f64, f64)>,

    pub inserted_locations: Vec<NewLocation>,
    pub events: Vec<NewEvent>,
    pub coverage: Vec<(i32, Uuid)>,
    pub occurrences: Vec<NewOccurrence>,
    pub location_logs: Vec<(LocationLogEntry, AuditStamp)>,
    pub event_logs: Vec<(EventLogEntry, AuditStamp)>,
    pub occurrence_logs: Vec<(OccurrenceLogEntry, AuditStamp)>,

    /// Taxon that stops resolving once this many events are committed
    pub taxon_vanishes: Option<(String, usize)>,
    /// Every call fails as if the database were unreachable
    pub offline: bool,
    /// `write_event` fails once this many events are stored
    pub writes_fail_after: Option<usize>,
}

impl MemoryState {
    /// Total rows written to any table
    pub fn write_count(&self) -> usize {
        self.inserted_locations.len()
            + self.events.len()
            + self.coverage.len()
            + self.occurrences.len()
            + self.location_logs.len()
            + self.event_logs.len()
            + self.occurrence_logs.len()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(self, location_id: Uuid, point: Point) -> Self {
        self.lock().locations.push(StoredLocation {
            location_id,
            point,
            legacy_code: None,
        });
        self
    }

    pub fn with_legacy_location(self, location_id: Uuid, point: Point, code: i32) -> Self {
        self.lock().locations.push(StoredLocation {
            location_id,
            point,
            legacy_code: Some(code),
        });
        self
    }

    pub fn with_taxon(self, scientific_name: &str, taxon_id: i32) -> Self {
        self.lock().taxa.insert(scientific_name.to_string(), taxon_id);
        self
    }

    pub fn with_ecotype(self, vernacular_name: &str, ecotype_id: i32) -> Self {
        self.lock()
            .ecotypes
            .insert(vernacular_name.to_string(), ecotype_id);
        self
    }

    pub fn with_transform(self, from_srid: i32, to_srid: i32, offset: (f64, f64)) -> Self {
        self.lock().transforms.insert((from_srid, to_srid), offset);
        self
    }

    /// Make `scientific_name` unresolvable after `events` events are written
    pub fn with_taxon_vanishing_after(self, scientific_name: &str, events: usize) -> Self {
        self.lock().taxon_vanishes = Some((scientific_name.to_string(), events));
        self
    }

    pub fn with_writes_failing_after(self, events: usize) -> Self {
        self.lock().writes_fail_after = Some(events);
        self
    }

    pub fn offline(self) -> Self {
        self.lock().offline = true;
        self
    }

    pub fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }

    fn check_online(state: &MemoryState) -> Result<(), StoreError> {
        if state.offline {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl NofaStore for MemoryStore {
    async fn location_exists(&self, location_id: Uuid) -> Result<bool, StoreError> {
        let state = self.lock();
        Self::check_online(&state)?;
        Ok(state
            .locations
            .iter()
            .any(|l| l.location_id == location_id))
    }

    async fn location_by_legacy_code(&self, code: i32) -> Result<Option<Uuid>, StoreError> {
        let state = self.lock();
        Self::check_online(&state)?;
        Ok(state
            .locations
            .iter()
            .find(|l| l.legacy_code == Some(code))
            .map(|l| l.location_id))
    }

    async fn transform_point(
        &self,
        point: Point,
        from_srid: i32,
        to_srid: i32,
    ) -> Result<Point, StoreError> {
        let state = self.lock();
        Self::check_online(&state)?;
        let (dx, dy) = state
            .transforms
            .get(&(from_srid, to_srid))
            .copied()
            .unwrap_or((0.0, 0.0));
        Ok(Point::new(point.x + dx, point.y + dy))
    }

    async fn nearest_location(
        &self,
        point: Point,
        _srid: i32,
        max_distance: Option<f64>,
    ) -> Result<Option<NearestLocation>, StoreError> {
        let state = self.lock();
        Self::check_online(&state)?;
        Ok(state
            .locations
            .iter()
            .map(|l| NearestLocation {
                location_id: l.location_id,
                distance: l.point.distance_to(&point),
            })
            .filter(|n| max_distance.map_or(true, |max| n.distance <= max))
            .min_by(|a, b| a.distance.total_cmp(&b.distance)))
    }

    async fn insert_location(
        &self,
        location: &NewLocation,
        stamp: &AuditStamp,
    ) -> Result<(), StoreError> {
        let mut state = self.lock();
        Self::check_online(&state)?;
        state.locations.push(StoredLocation {
            location_id: location.location_id,
            point: location.point,
            legacy_code: None,
        });
        state.inserted_locations.push(location.clone());
        state
            .location_logs
            .push((location.log_entry(), stamp.clone()));
        Ok(())
    }

    async fn taxon_id(&self, scientific_name: &str) -> Result<Option<i32>, StoreError> {
        let state = self.lock();
        Self::check_online(&state)?;
        if let Some((ref name, after)) = state.taxon_vanishes {
            if name == scientific_name && state.events.len() >= after {
                return Ok(None);
            }
        }
        Ok(state.taxa.get(scientific_name).copied())
    }

    async fn ecotype_id(&self, vernacular_name: &str) -> Result<Option<i32>, StoreError> {
        let state = self.lock();
        Self::check_online(&state)?;
        Ok(state.ecotypes.get(vernacular_name).copied())
    }

    async fn write_event(&self, batch: &EventBatch) -> Result<(), StoreError> {
        let mut state = self.lock();
        Self::check_online(&state)?;
        if state.writes_fail_after.is_some_and(|n| state.events.len() >= n) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        let event = &batch.event;

        state.events.push(event.clone());
        state
            .event_logs
            .push((event.log_entry(), batch.stamp.clone()));
        for taxon_id in &batch.coverage_taxon_ids {
            state.coverage.push((*taxon_id, event.event_id));
        }
        for occurrence in &batch.occurrences {
            state.occurrences.push(occurrence.clone());
            state
                .occurrence_logs
                .push((occurrence.log_entry(event), batch.stamp.clone()));
        }
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn stamp() -> AuditStamp {
    AuditStamp::new("tester", true)
}

/// Event values with every mandatory field filled in
pub fn valid_event() -> EventFields {
    EventFields {
        sampling_protocol: Some("electrofishing".to_string()),
        date_start: NaiveDate::from_ymd_opt(2017, 6, 1),
        date_end: NaiveDate::from_ymd_opt(2017, 6, 2),
        recorded_by: Some("Kari Nordmann".to_string()),
        ..Default::default()
    }
}

pub fn valid_metadata() -> MetadataIds {
    MetadataIds {
        dataset_id: Some("nofa-2017".to_string()),
        project_id: Some("fish-survey".to_string()),
        reference_id: Some(7),
    }
}

/// Occurrence row with every mandatory field filled in
pub fn occurrence(taxon: &str) -> OccurrenceRow {
    OccurrenceRow {
        taxon: Some(taxon.to_string()),
        occurrence_status: Some("present".to_string()),
        establishment_means: Some("native".to_string()),
        ..Default::default()
    }
}
