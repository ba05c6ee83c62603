//! Database queries for the plugin log tables

use sqlx::{PgConnection, PgPool};
use tracing::debug;

use super::models::{
    AuditKind, AuditStamp, EventLogEntry, HistoryEntry, HistoryQuery, LocationLogEntry,
    OccurrenceLogEntry, HISTORY_LINK_COLUMNS, MAX_HISTORY_LIMIT,
};

/// Append a location log row
///
/// Runs on the caller's connection so it commits together with the insert
/// it describes.
pub async fn insert_location_log(
    conn: &mut PgConnection,
    entry: &LocationLogEntry,
    stamp: &AuditStamp,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO plugin.location_log (location_id, location_name, test, username)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(entry.location_id)
    .bind(&entry.location_name)
    .bind(stamp.test)
    .bind(&stamp.username)
    .execute(&mut *conn)
    .await?;

    debug!(location_id = %entry.location_id, "Logged location insert");
    Ok(())
}

pub async fn insert_event_log(
    conn: &mut PgConnection,
    entry: &EventLogEntry,
    stamp: &AuditStamp,
) -> Result<(), sqlx::Error> {
    // location_id is a text column in plugin.event_log
    sqlx::query(
        r#"
        INSERT INTO plugin.event_log (
            event_id, location_id, dataset_id, project_id, reference_id, test, username
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(entry.event_id)
    .bind(entry.location_id.to_string())
    .bind(&entry.dataset_id)
    .bind(&entry.project_id)
    .bind(entry.reference_id)
    .bind(stamp.test)
    .bind(&stamp.username)
    .execute(&mut *conn)
    .await?;

    debug!(event_id = %entry.event_id, "Logged event insert");
    Ok(())
}

pub async fn insert_occurrence_log(
    conn: &mut PgConnection,
    entry: &OccurrenceLogEntry,
    stamp: &AuditStamp,
) -> Result<(), sqlx::Error> {
    // All id columns of plugin.occurrence_log are text
    sqlx::query(
        r#"
        INSERT INTO plugin.occurrence_log (
            occurrence_id, event_id, dataset_id, project_id, reference_id,
            location_id, test, username
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(entry.occurrence_id.to_string())
    .bind(entry.event_id.to_string())
    .bind(&entry.dataset_id)
    .bind(&entry.project_id)
    .bind(entry.reference_id)
    .bind(entry.location_id.to_string())
    .bind(stamp.test)
    .bind(&stamp.username)
    .execute(&mut *conn)
    .await?;

    debug!(occurrence_id = %entry.occurrence_id, "Logged occurrence insert");
    Ok(())
}

/// Build the history SQL for `query`, returning it with the number of
/// placeholders used before `LIMIT`
fn history_sql(query: &HistoryQuery) -> (String, usize) {
    let kind = query.kind;
    // Columns a log lacks are selected as NULL so every kind maps to HistoryEntry
    let links = HISTORY_LINK_COLUMNS
        .iter()
        .map(|column| {
            if kind.linked_columns().contains(column) {
                format!("{column}::text AS {column}")
            } else {
                format!("NULL::text AS {column}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!(
        r#"
        SELECT {id}::text AS entity_id, COALESCE(username, '') AS username, test,
               insert_timestamp, update_timestamp, {links}
        FROM {table}
        WHERE 1=1
        "#,
        id = kind.id_column(),
        table = kind.table(),
    );

    let mut bind_count = 1;
    let filters = [
        (query.username.is_some(), "username LIKE"),
        (query.inserted_from.is_some(), "date(insert_timestamp) >="),
        (query.inserted_to.is_some(), "date(insert_timestamp) <="),
        (query.updated_from.is_some(), "date(update_timestamp) >="),
        (query.updated_to.is_some(), "date(update_timestamp) <="),
    ];
    for (active, condition) in filters {
        if active {
            sql.push_str(&format!(" AND {condition} ${bind_count}"));
            bind_count += 1;
        }
    }

    sql.push_str(" ORDER BY insert_timestamp DESC");
    sql.push_str(&format!(" LIMIT ${bind_count}"));

    (sql, bind_count - 1)
}

/// Browse one log table
#[tracing::instrument(skip(pool), fields(kind = %query.kind))]
pub async fn query_history(
    pool: &PgPool,
    query: &HistoryQuery,
) -> Result<Vec<HistoryEntry>, sqlx::Error> {
    let limit = query.limit.clamp(1, MAX_HISTORY_LIMIT);
    let (sql, _) = history_sql(query);

    let mut builder = sqlx::query_as::<_, HistoryEntry>(&sql);
    if let Some(ref username) = query.username {
        builder = builder.bind(username);
    }
    for date in [
        query.inserted_from,
        query.inserted_to,
        query.updated_from,
        query.updated_to,
    ]
    .into_iter()
    .flatten()
    {
        builder = builder.bind(date);
    }

    let records = builder.bind(limit).fetch_all(pool).await?;

    debug!(count = records.len(), "Queried history");
    Ok(records)
}

/// Database users whose accounts have not expired
#[tracing::instrument(skip(pool))]
pub async fn list_active_users(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT usename::text
        FROM pg_catalog.pg_user
        WHERE CURRENT_TIMESTAMP < valuntil
        ORDER BY usename
        "#,
    )
    .fetch_all(pool)
    .await
}
