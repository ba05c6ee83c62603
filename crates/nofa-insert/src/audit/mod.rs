//! Audit logging
//!
//! Every location, event and occurrence written by the insert workflow gets
//! an append-only row in its `plugin.<kind>_log` table recording the
//! submitting user and the test flag. Log rows are written on the same
//! connection (and therefore in the same transaction) as the entity they
//! describe. The dataset, project and reference logs are filled by other
//! tools; they are readable through [`query_history`].
//!
//! # Example
//!
//! ```no_run
//! use nofa_insert::audit::{query_history, AuditKind, HistoryQuery};
//! use sqlx::PgPool;
//!
//! # async fn example(pool: &PgPool) -> Result<(), sqlx::Error> {
//! let query = HistoryQuery::new(AuditKind::Event).username("ola%");
//! for row in query_history(pool, &query).await? {
//!     println!("{} {}", row.entity_id, row.username);
//! }
//! # Ok(())
//! # }
//! ```

mod models;
mod queries;

pub use models::{
    AuditKind, AuditStamp, EventLogEntry, HistoryEntry, HistoryQuery, LocationLogEntry,
    OccurrenceLogEntry, DEFAULT_HISTORY_LIMIT, HISTORY_LINK_COLUMNS, MAX_HISTORY_LIMIT,
};
pub use queries::{
    insert_event_log, insert_location_log, insert_occurrence_log, list_active_users,
    query_history,
};
