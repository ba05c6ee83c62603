//! Storage seam for the insert workflow
//!
//! The location resolver and the observation writer talk to the NOFA
//! database only through [`NofaStore`]. [`PgStore`] is the PostgreSQL/PostGIS
//! implementation; tests use an in-memory recorder.

mod postgres;
mod records;

pub use postgres::PgStore;
pub use records::{EventBatch, NearestLocation, NewEvent, NewLocation, NewOccurrence};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::audit::AuditStamp;
use crate::features::locations::types::Point;

/// Database access failure (connectivity, permissions, constraint)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Reads and writes the resolver and the observation writer need
#[async_trait]
pub trait NofaStore: Send + Sync {
    async fn location_exists(&self, location_id: Uuid) -> Result<bool, StoreError>;

    /// Location carrying the given legacy lake code
    async fn location_by_legacy_code(&self, code: i32) -> Result<Option<Uuid>, StoreError>;

    /// Reproject a point between two SRIDs
    async fn transform_point(
        &self,
        point: Point,
        from_srid: i32,
        to_srid: i32,
    ) -> Result<Point, StoreError>;

    /// Nearest stored location to `point` (in `srid`), optionally limited to
    /// `max_distance` storage units
    async fn nearest_location(
        &self,
        point: Point,
        srid: i32,
        max_distance: Option<f64>,
    ) -> Result<Option<NearestLocation>, StoreError>;

    /// Insert a location and its log row atomically
    async fn insert_location(
        &self,
        location: &NewLocation,
        stamp: &AuditStamp,
    ) -> Result<(), StoreError>;

    /// Taxon id by scientific name
    async fn taxon_id(&self, scientific_name: &str) -> Result<Option<i32>, StoreError>;

    /// Ecotype id by vernacular name
    async fn ecotype_id(&self, vernacular_name: &str) -> Result<Option<i32>, StoreError>;

    /// Write one event with its coverage links, occurrences and log rows in
    /// a single transaction
    async fn write_event(&self, batch: &EventBatch) -> Result<(), StoreError>;
}
