//! Fixtures shared by the database integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use nofa_insert::audit::AuditStamp;
use nofa_insert::features::observations::{EventFields, MetadataIds, OccurrenceRow};
use sqlx::PgPool;
use uuid::Uuid;

pub const STORAGE_SRID: i32 = 25833;

/// Insert a stored location at a UTM33 point
pub async fn seed_location(
    pool: &PgPool,
    x: f64,
    y: f64,
    legacy_code: Option<i32>,
    water_body: Option<&str>,
) -> sqlx::Result<Uuid> {
    let location_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO nofa.location (
            "locationID", "locationType", "geom", "waterBody",
            "countryCode", "county", "municipality", "no_vatn_lnr"
        )
        VALUES ($1, 'samplingPoint lake', ST_Multi(ST_SetSRID(ST_MakePoint($2, $3), $4)),
                $5, 'NO', 'Oslo', 'Oslo', $6)
        "#,
    )
    .bind(location_id)
    .bind(x)
    .bind(y)
    .bind(STORAGE_SRID)
    .bind(water_body)
    .bind(legacy_code)
    .execute(pool)
    .await?;

    Ok(location_id)
}

pub async fn seed_taxon(
    pool: &PgPool,
    taxon_id: i32,
    scientific_name: &str,
    rank: &str,
    family: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO nofa.l_taxon ("taxonID", "scientificName", "taxonRank", "family")
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(taxon_id)
    .bind(scientific_name)
    .bind(rank)
    .bind(family)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn seed_ecotype(
    pool: &PgPool,
    ecotype_id: i32,
    taxon_id: i32,
    vernacular_name: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO nofa.l_ecotype ("ecotypeID", "taxonID", "vernacularName")
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(ecotype_id)
    .bind(taxon_id)
    .bind(vernacular_name)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn count_rows(pool: &PgPool, table: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
}

pub fn stamp() -> AuditStamp {
    AuditStamp::new("tester", true)
}

pub fn event_fields() -> EventFields {
    EventFields {
        sampling_protocol: Some("gillnet".to_string()),
        date_start: NaiveDate::from_ymd_opt(2017, 6, 1),
        date_end: NaiveDate::from_ymd_opt(2017, 6, 2),
        recorded_by: Some("Ola Nordmann".to_string()),
        ..Default::default()
    }
}

pub fn metadata() -> MetadataIds {
    MetadataIds {
        dataset_id: Some("nofa-2017".to_string()),
        project_id: Some("12".to_string()),
        reference_id: None,
    }
}

pub fn occurrence(taxon: &str) -> OccurrenceRow {
    OccurrenceRow {
        taxon: Some(taxon.to_string()),
        occurrence_status: Some("present".to_string()),
        establishment_means: Some("native".to_string()),
        organism_quantity: Some(3.0),
        ..Default::default()
    }
}
