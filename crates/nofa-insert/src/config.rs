//! Configuration management
//!
//! Settings come from the process environment, optionally seeded from a
//! `.env` file. `DATABASE_URL` wins over the individual `NOFA_DB_*` values.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;

use crate::audit::AuditStamp;
use crate::features::locations::types::ResolverSettings;

// ============================================================================
// Database Configuration Constants
// ============================================================================

/// Default database host.
pub const DEFAULT_DB_HOST: &str = "localhost";

/// Default database port.
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Default database name.
pub const DEFAULT_DB_NAME: &str = "nofa";

/// The insert workflow runs in a single database session.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 1;

/// Default connect timeout in seconds.
pub const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Submission Configuration Constants
// ============================================================================

/// SRID of stored location geometries (ETRS89 / UTM zone 33N).
pub const DEFAULT_STORAGE_SRID: i32 = 25833;

/// Search radius for "use nearest" coordinates, in storage units (metres).
pub const DEFAULT_NEAREST_MAX_DISTANCE: f64 = 10.0;

/// Location type written for newly created locations.
pub const DEFAULT_LOCATION_TYPE: &str = "samplingPoint lake";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub submission: SubmissionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; overrides the discrete fields when present
    #[serde(skip_serializing)]
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Recorded in every audit row
    pub username: String,
    /// Recorded as the audit `test` flag
    pub test_mode: bool,
    pub storage_srid: i32,
    /// `None` searches without a distance limit
    pub nearest_max_distance: Option<f64>,
    pub location_type: String,
}

impl Config {
    /// Load configuration from `.env` and the environment
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let user = var("NOFA_DB_USER");
        let database = DatabaseConfig {
            url: var("DATABASE_URL"),
            host: var("NOFA_DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
            port: parse_or(var("NOFA_DB_PORT"), "NOFA_DB_PORT", DEFAULT_DB_PORT)?,
            name: var("NOFA_DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            user: user.clone(),
            password: var("NOFA_DB_PASSWORD"),
            max_connections: parse_or(
                var("NOFA_DB_MAX_CONNECTIONS"),
                "NOFA_DB_MAX_CONNECTIONS",
                DEFAULT_DB_MAX_CONNECTIONS,
            )?,
            connect_timeout_secs: parse_or(
                var("NOFA_DB_CONNECT_TIMEOUT"),
                "NOFA_DB_CONNECT_TIMEOUT",
                DEFAULT_DB_CONNECT_TIMEOUT_SECS,
            )?,
        };

        let nearest_max_distance = match var("NOFA_NEAREST_MAX_DISTANCE") {
            None => Some(DEFAULT_NEAREST_MAX_DISTANCE),
            Some(v) if v.trim().eq_ignore_ascii_case("unbounded") => None,
            Some(v) => Some(parse_value(&v, "NOFA_NEAREST_MAX_DISTANCE")?),
        };

        let submission = SubmissionConfig {
            username: var("NOFA_USERNAME")
                .or(user)
                .or_else(|| var("USER"))
                .unwrap_or_default(),
            test_mode: parse_or(var("NOFA_TEST_MODE"), "NOFA_TEST_MODE", false)?,
            storage_srid: parse_or(var("NOFA_STORAGE_SRID"), "NOFA_STORAGE_SRID", DEFAULT_STORAGE_SRID)?,
            nearest_max_distance,
            location_type: var("NOFA_LOCATION_TYPE")
                .unwrap_or_else(|| DEFAULT_LOCATION_TYPE.to_string()),
        };

        let config = Config {
            database,
            submission,
        };
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.is_none() && self.database.host.is_empty() {
            anyhow::bail!("Either DATABASE_URL or NOFA_DB_HOST must be set");
        }

        if self.database.port == 0 {
            anyhow::bail!("Database port must be greater than 0");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be greater than 0");
        }

        if self.submission.storage_srid <= 0 {
            anyhow::bail!("Storage SRID must be positive, got {}", self.submission.storage_srid);
        }

        if let Some(distance) = self.submission.nearest_max_distance {
            if !distance.is_finite() || distance < 0.0 {
                anyhow::bail!("Nearest-location distance must be a non-negative number, got {distance}");
            }
        }

        if self.submission.username.is_empty() {
            tracing::warn!("No username configured - audit rows will carry an empty username");
        }

        Ok(())
    }

    /// Connection options for the configured database
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        let db = &self.database;
        if let Some(ref url) = db.url {
            return Ok(PgConnectOptions::from_str(url)?);
        }

        let mut options = PgConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .database(&db.name);
        if let Some(ref user) = db.user {
            options = options.username(user);
        }
        if let Some(ref password) = db.password {
            options = options.password(password);
        }

        Ok(options)
    }

    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            storage_srid: self.submission.storage_srid,
            nearest_max_distance: self.submission.nearest_max_distance,
            location_type: self.submission.location_type.clone(),
        }
    }

    /// Stamp recorded on every row this session writes
    pub fn audit_stamp(&self) -> AuditStamp {
        AuditStamp::new(self.submission.username.clone(), self.submission.test_mode)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: None,
                host: DEFAULT_DB_HOST.to_string(),
                port: DEFAULT_DB_PORT,
                name: DEFAULT_DB_NAME.to_string(),
                user: None,
                password: None,
                max_connections: DEFAULT_DB_MAX_CONNECTIONS,
                connect_timeout_secs: DEFAULT_DB_CONNECT_TIMEOUT_SECS,
            },
            submission: SubmissionConfig {
                username: String::new(),
                test_mode: false,
                storage_srid: DEFAULT_STORAGE_SRID,
                nearest_max_distance: Some(DEFAULT_NEAREST_MAX_DISTANCE),
                location_type: DEFAULT_LOCATION_TYPE.to_string(),
            },
        }
    }
}

fn parse_value<T: FromStr>(raw: &str, key: &str) -> anyhow::Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid value for {key}: '{raw}'"))
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> anyhow::Result<T> {
    match raw {
        Some(v) => parse_value(&v, key),
        None => Ok(default),
    }
}
