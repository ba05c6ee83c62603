use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

/// Tables the insert workflow writes to
pub const REQUIRED_TABLES: [&str; 3] = ["location", "event", "occurrence"];

/// Database setup errors with contextual information
#[derive(Error, Debug)]
pub enum DbError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Connection settings are invalid or missing
    #[error("Database configuration error: {0}. Check NOFA_DB_* or DATABASE_URL.")]
    Config(String),

    /// Connected database lacks the NOFA schema
    #[error("Database is not a NOFA database: missing tables {0:?} in schema 'nofa'")]
    NotNofa(Vec<String>),

    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type DbResult<T> = Result<T, DbError>;

/// Open the connection pool described by `config`
pub async fn connect(config: &Config) -> DbResult<PgPool> {
    let options = config
        .connect_options()
        .map_err(|e| DbError::Config(e.to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .connect_with(options)
        .await?;

    tracing::info!(
        max_connections = config.database.max_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// Names from [`REQUIRED_TABLES`] not found among `present`
fn missing_tables(present: &[String]) -> Vec<String> {
    REQUIRED_TABLES
        .iter()
        .filter(|table| !present.iter().any(|p| p == *table))
        .map(|table| table.to_string())
        .collect()
}

/// Fail unless the `nofa` schema has the location, event and occurrence tables
pub async fn check_nofa_tables(pool: &PgPool) -> DbResult<()> {
    let required: Vec<String> = REQUIRED_TABLES.iter().map(|t| t.to_string()).collect();

    let present = sqlx::query_scalar::<_, String>(
        r#"
        SELECT table_name::TEXT
        FROM information_schema.tables
        WHERE table_schema = 'nofa'
          AND table_name = ANY($1)
        "#,
    )
    .bind(&required)
    .fetch_all(pool)
    .await?;

    let missing = missing_tables(&present);
    if !missing.is_empty() {
        return Err(DbError::NotNofa(missing));
    }

    tracing::debug!("NOFA schema present");
    Ok(())
}

/// Apply the bundled migrations
pub async fn run_migrations(pool: &PgPool) -> DbResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}
