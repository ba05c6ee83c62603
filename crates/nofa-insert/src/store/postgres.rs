//! PostgreSQL/PostGIS implementation of [`NofaStore`]

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use super::records::{EventBatch, NearestLocation, NewEvent, NewLocation, NewOccurrence};
use super::{NofaStore, StoreError};
use crate::audit::{self, AuditStamp};
use crate::features::locations::types::Point;

/// NOFA store backed by a connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NofaStore for PgStore {
    async fn location_exists(&self, location_id: Uuid) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM nofa.location WHERE "locationID" = $1
            )
            "#,
        )
        .bind(location_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn location_by_legacy_code(&self, code: i32) -> Result<Option<Uuid>, StoreError> {
        let location_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT "locationID"
            FROM nofa.location
            WHERE "no_vatn_lnr" = $1
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(location_id)
    }

    async fn transform_point(
        &self,
        point: Point,
        from_srid: i32,
        to_srid: i32,
    ) -> Result<Point, StoreError> {
        if from_srid == to_srid {
            return Ok(point);
        }

        let (x, y) = sqlx::query_as::<_, (f64, f64)>(
            r#"
            SELECT ST_X(g), ST_Y(g)
            FROM (
                SELECT ST_Transform(ST_SetSRID(ST_MakePoint($1, $2), $3), $4) AS g
            ) t
            "#,
        )
        .bind(point.x)
        .bind(point.y)
        .bind(from_srid)
        .bind(to_srid)
        .fetch_one(&self.pool)
        .await?;

        debug!(from_srid, to_srid, x, y, "Transformed point");
        Ok(Point::new(x, y))
    }

    async fn nearest_location(
        &self,
        point: Point,
        srid: i32,
        max_distance: Option<f64>,
    ) -> Result<Option<NearestLocation>, StoreError> {
        let nearest = sqlx::query_as::<_, (Uuid, f64)>(
            r#"
            SELECT l."locationID", ST_Distance(l.geom, p.geom) AS distance
            FROM nofa.location l,
                 (SELECT ST_SetSRID(ST_MakePoint($1, $2), $3) AS geom) p
            WHERE $4::float8 IS NULL OR ST_DWithin(l.geom, p.geom, $4)
            ORDER BY ST_Distance(l.geom, p.geom)
            LIMIT 1
            "#,
        )
        .bind(point.x)
        .bind(point.y)
        .bind(srid)
        .bind(max_distance)
        .fetch_optional(&self.pool)
        .await?;

        Ok(nearest.map(|(location_id, distance)| NearestLocation {
            location_id,
            distance,
        }))
    }

    async fn insert_location(
        &self,
        location: &NewLocation,
        stamp: &AuditStamp,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO nofa.location ("locationID", "locationType", "geom", "verbatimLocality")
            VALUES ($1, $2, ST_Multi(ST_SetSRID(ST_MakePoint($3, $4), $5)), $6)
            "#,
        )
        .bind(location.location_id)
        .bind(&location.location_type)
        .bind(location.point.x)
        .bind(location.point.y)
        .bind(location.srid)
        .bind(&location.verbatim_locality)
        .execute(&mut *tx)
        .await?;

        audit::insert_location_log(&mut tx, &location.log_entry(), stamp).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn taxon_id(&self, scientific_name: &str) -> Result<Option<i32>, StoreError> {
        let taxon_id = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT "taxonID"
            FROM nofa.l_taxon
            WHERE "scientificName" = $1
            LIMIT 1
            "#,
        )
        .bind(scientific_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(taxon_id)
    }

    async fn ecotype_id(&self, vernacular_name: &str) -> Result<Option<i32>, StoreError> {
        let ecotype_id = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT "ecotypeID"
            FROM nofa.l_ecotype
            WHERE "vernacularName" = $1
            LIMIT 1
            "#,
        )
        .bind(vernacular_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ecotype_id)
    }

    async fn write_event(&self, batch: &EventBatch) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        let event = &batch.event;

        insert_event(&mut tx, event).await?;
        audit::insert_event_log(&mut tx, &event.log_entry(), &batch.stamp).await?;

        for taxon_id in &batch.coverage_taxon_ids {
            sqlx::query(
                r#"
                INSERT INTO nofa."samplingTaxaRange" ("taxonID", "eventID")
                VALUES ($1, $2)
                "#,
            )
            .bind(taxon_id)
            .bind(event.event_id)
            .execute(&mut *tx)
            .await?;
        }

        for occurrence in &batch.occurrences {
            insert_occurrence(&mut tx, occurrence).await?;
            audit::insert_occurrence_log(&mut tx, &occurrence.log_entry(event), &batch.stamp)
                .await?;
        }

        tx.commit().await?;

        debug!(
            event_id = %event.event_id,
            occurrences = batch.occurrences.len(),
            coverage = batch.coverage_taxon_ids.len(),
            "Event batch committed"
        );
        Ok(())
    }
}

async fn insert_event(conn: &mut PgConnection, event: &NewEvent) -> Result<(), sqlx::Error> {
    let fields = &event.fields;
    sqlx::query(
        r#"
        INSERT INTO nofa.event (
            "locationID", "eventID", "samplingProtocol", "sampleSizeUnit",
            "sampleSizeValue", "samplingEffort", "dateStart", "dateEnd",
            "fieldNumber", "recordedBy", "eventRemarks", "reliability",
            "datasetID", "projectID", "referenceID"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(event.location_id)
    .bind(event.event_id)
    .bind(&fields.sampling_protocol)
    .bind(&fields.sample_size_unit)
    .bind(fields.sample_size_value)
    .bind(fields.sampling_effort)
    .bind(fields.date_start)
    .bind(fields.date_end)
    .bind(&fields.field_number)
    .bind(&fields.recorded_by)
    .bind(&fields.event_remarks)
    .bind(&fields.reliability)
    .bind(&event.dataset_id)
    .bind(&event.project_id)
    .bind(event.reference_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn insert_occurrence(
    conn: &mut PgConnection,
    occurrence: &NewOccurrence,
) -> Result<(), sqlx::Error> {
    let row = &occurrence.row;
    sqlx::query(
        r#"
        INSERT INTO nofa.occurrence (
            "occurrenceID", "taxonID", "ecotypeID", "organismQuantityType",
            "organismQuantity", "occurrenceStatus", "populationTrend",
            "recordNumber", "occurrenceRemarks", "establishmentMeans",
            "establishmentRemarks", "spawningCondition", "spawningLocation",
            "verifiedBy", "verifiedDate", "modified", "eventID"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        "#,
    )
    .bind(occurrence.occurrence_id)
    .bind(occurrence.taxon_id)
    .bind(occurrence.ecotype_id)
    .bind(&row.organism_quantity_type)
    .bind(row.organism_quantity)
    .bind(&row.occurrence_status)
    .bind(&row.population_trend)
    .bind(&row.record_number)
    .bind(&row.occurrence_remarks)
    .bind(&row.establishment_means)
    .bind(&row.establishment_remarks)
    .bind(&row.spawning_condition)
    .bind(&row.spawning_location)
    .bind(&row.verified_by)
    .bind(row.verified_date)
    .bind(occurrence.modified)
    .bind(occurrence.event_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
