use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::fields::filter_value;

/// Default number of locations returned by a search
pub const DEFAULT_SEARCH_LIMIT: i64 = 500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchLocationsQuery {
    /// Substring of the water body name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LocationSummary {
    pub location_id: Uuid,
    pub water_body: Option<String>,
    pub county: Option<String>,
    pub municipality: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchLocationsResponse {
    pub items: Vec<LocationSummary>,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchLocationsError {
    #[error("Limit must be between 1 and 10000")]
    InvalidLimit,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl SearchLocationsQuery {
    pub fn validate(&self) -> Result<(), SearchLocationsError> {
        if let Some(limit) = self.limit {
            if !(1..=10_000).contains(&limit) {
                return Err(SearchLocationsError::InvalidLimit);
            }
        }
        Ok(())
    }

    /// `LIKE` pattern for the water body filter; blank and `<all>` mean no filter
    fn water_body_pattern(&self) -> Option<String> {
        filter_value(self.water_body.as_deref()).map(|wb| format!("%{wb}%"))
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: &PgPool,
    query: SearchLocationsQuery,
) -> Result<SearchLocationsResponse, SearchLocationsError> {
    query.validate()?;

    let items = sqlx::query_as::<_, LocationSummary>(
        r#"
        SELECT "locationID" AS location_id,
               "waterBody" AS water_body,
               "county" AS county,
               "municipality" AS municipality
        FROM nofa.location
        WHERE ($1::TEXT IS NULL OR "waterBody" LIKE $1)
          AND ($2::TEXT IS NULL OR "countryCode" = $2)
          AND ($3::TEXT IS NULL OR "county" = $3)
          AND ($4::TEXT IS NULL OR "municipality" = $4)
        ORDER BY "waterBody", "locationID"
        LIMIT $5
        "#,
    )
    .bind(query.water_body_pattern())
    .bind(filter_value(query.country_code.as_deref()))
    .bind(filter_value(query.county.as_deref()))
    .bind(filter_value(query.municipality.as_deref()))
    .bind(query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
    .fetch_all(pool)
    .await?;

    tracing::debug!(count = items.len(), "Locations found");
    Ok(SearchLocationsResponse { items })
}

/// Distinct country codes of stored locations
#[tracing::instrument(skip(pool))]
pub async fn list_country_codes(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT "countryCode"
        FROM nofa.location
        WHERE "countryCode" IS NOT NULL
        ORDER BY "countryCode"
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Distinct counties, optionally within one country
#[tracing::instrument(skip(pool))]
pub async fn list_counties(
    pool: &PgPool,
    country_code: Option<&str>,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT "county"
        FROM nofa.location
        WHERE "county" IS NOT NULL
          AND ($1::TEXT IS NULL OR "countryCode" = $1)
        ORDER BY "county"
        "#,
    )
    .bind(filter_value(country_code))
    .fetch_all(pool)
    .await
}

/// Distinct municipalities, optionally within one country and county
#[tracing::instrument(skip(pool))]
pub async fn list_municipalities(
    pool: &PgPool,
    country_code: Option<&str>,
    county: Option<&str>,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT "municipality"
        FROM nofa.location
        WHERE "municipality" IS NOT NULL
          AND ($1::TEXT IS NULL OR "countryCode" = $1)
          AND ($2::TEXT IS NULL OR "county" = $2)
        ORDER BY "municipality"
        "#,
    )
    .bind(filter_value(country_code))
    .bind(filter_value(county))
    .fetch_all(pool)
    .await
}
