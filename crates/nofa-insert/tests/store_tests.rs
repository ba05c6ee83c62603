//! PostgreSQL/PostGIS store and insert workflow tests
//!
//! These run against a database with PostGIS available:
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/nofa_test cargo test
//! ```

use chrono::Utc;
use nofa_insert::features::locations::commands::resolve;
use nofa_insert::features::locations::{
    CoordinateMode, Crs, LocationInput, Point, ResolveLocationCommand, ResolveLocationError,
    ResolverSettings,
};
use nofa_insert::features::locations::commands::ResolutionOutcome;
use nofa_insert::features::observations::commands::{record, submit};
use nofa_insert::features::observations::{
    RecordObservationsCommand, SubmitObservationsCommand, SubmitObservationsError,
};
use nofa_insert::store::{EventBatch, NewEvent, NewLocation, NewOccurrence};
use nofa_insert::{NofaStore, PgStore};
use sqlx::PgPool;
use uuid::Uuid;

mod common;

use common::{count_rows, event_fields, metadata, occurrence, seed_location, seed_taxon, stamp};

// ============================================================================
// Store
// ============================================================================

#[sqlx::test(migrations = "../../migrations")]
async fn test_location_lookups(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let location_id = seed_location(&pool, 601404.0, 6644928.0, Some(3067), None).await?;
    let store = PgStore::new(pool);

    assert!(store.location_exists(location_id).await?);
    assert!(!store.location_exists(Uuid::new_v4()).await?);
    assert_eq!(store.location_by_legacy_code(3067).await?, Some(location_id));
    assert_eq!(store.location_by_legacy_code(1).await?, None);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_nearest_location_respects_cutoff(
    pool: PgPool,
) -> Result<(), Box<dyn std::error::Error>> {
    let near = seed_location(&pool, 601404.0, 6644928.0, None, None).await?;
    seed_location(&pool, 601500.0, 6644928.0, None, None).await?;
    let store = PgStore::new(pool);

    let found = store
        .nearest_location(Point::new(601407.0, 6644932.0), 25833, Some(10.0))
        .await?
        .expect("a location within 10 m");
    assert_eq!(found.location_id, near);
    assert!((found.distance - 5.0).abs() < 1e-6);

    let none = store
        .nearest_location(Point::new(602000.0, 6644928.0), 25833, Some(10.0))
        .await?;
    assert!(none.is_none());

    let unbounded = store
        .nearest_location(Point::new(602000.0, 6644928.0), 25833, None)
        .await?;
    assert!(unbounded.is_some());

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_transform_point_between_zones(
    pool: PgPool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = PgStore::new(pool);
    let point = Point::new(597000.0, 6643000.0);

    assert_eq!(store.transform_point(point, 25833, 25833).await?, point);

    let moved = store.transform_point(point, 25832, 25833).await?;
    assert!((moved.x - point.x).abs() > 1000.0);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_insert_location_writes_log(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let store = PgStore::new(pool.clone());
    let location = NewLocation {
        location_id: Uuid::new_v4(),
        point: Point::new(601404.0, 6644928.0),
        srid: 25833,
        location_type: "samplingPoint lake".to_string(),
        verbatim_locality: Some("Hovinbekken".to_string()),
    };

    store.insert_location(&location, &stamp()).await?;

    let srid = sqlx::query_scalar::<_, i32>(
        r#"SELECT ST_SRID("geom") FROM nofa.location WHERE "locationID" = $1"#,
    )
    .bind(location.location_id)
    .fetch_one(&pool)
    .await?;
    assert_eq!(srid, 25833);

    let (name, test, username) = sqlx::query_as::<_, (Option<String>, bool, String)>(
        "SELECT location_name, test, username FROM plugin.location_log WHERE location_id = $1",
    )
    .bind(location.location_id)
    .fetch_one(&pool)
    .await?;
    assert_eq!(name.as_deref(), Some("Hovinbekken"));
    assert!(test);
    assert_eq!(username, "tester");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_write_event_rolls_back_on_failure(
    pool: PgPool,
) -> Result<(), Box<dyn std::error::Error>> {
    let location_id = seed_location(&pool, 601404.0, 6644928.0, None, None).await?;
    let store = PgStore::new(pool.clone());

    let event = NewEvent::new(location_id, event_fields(), &metadata());
    // Taxon 999 does not exist, so the occurrence violates its foreign key
    let broken = NewOccurrence {
        occurrence_id: Uuid::new_v4(),
        event_id: event.event_id,
        taxon_id: 999,
        ecotype_id: None,
        row: occurrence("Salmo trutta"),
        modified: Utc::now().naive_utc(),
    };
    let batch = EventBatch {
        event,
        coverage_taxon_ids: vec![],
        occurrences: vec![broken],
        stamp: stamp(),
    };

    assert!(store.write_event(&batch).await.is_err());
    assert_eq!(count_rows(&pool, "nofa.event").await?, 0);
    assert_eq!(count_rows(&pool, "plugin.event_log").await?, 0);
    assert_eq!(count_rows(&pool, "nofa.occurrence").await?, 0);

    Ok(())
}

// ============================================================================
// Resolver
// ============================================================================

#[sqlx::test(migrations = "../../migrations")]
async fn test_resolve_all_three_modes(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let stored = seed_location(&pool, 601404.0, 6644928.0, Some(3067), None).await?;
    let store = PgStore::new(pool.clone());
    let settings = ResolverSettings::default();

    let by_id = resolve::handle(
        &store,
        &settings,
        ResolveLocationCommand::new(LocationInput::identifier(stored.to_string()), stamp()),
    )
    .await?;
    assert_eq!(by_id.location_id, stored);
    assert_eq!(by_id.outcome, ResolutionOutcome::Matched);

    let by_code = resolve::handle(
        &store,
        &settings,
        ResolveLocationCommand::new(LocationInput::legacy_code(3067), stamp()),
    )
    .await?;
    assert_eq!(by_code.location_id, stored);

    let nearest = resolve::handle(
        &store,
        &settings,
        ResolveLocationCommand::new(
            LocationInput::coordinates(601406.0, 6644928.0, Crs::Utm33, CoordinateMode::UseNearest),
            stamp(),
        ),
    )
    .await?;
    assert_eq!(nearest.location_id, stored);

    let created = resolve::handle(
        &store,
        &settings,
        ResolveLocationCommand::new(
            LocationInput::coordinates(601406.0, 6644928.0, Crs::Utm33, CoordinateMode::CreateNew),
            stamp(),
        ),
    )
    .await?;
    assert_ne!(created.location_id, stored);
    assert_eq!(created.outcome, ResolutionOutcome::Created);
    assert_eq!(count_rows(&pool, "nofa.location").await?, 2);
    assert_eq!(count_rows(&pool, "plugin.location_log").await?, 1);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_resolve_nearest_outside_cutoff(
    pool: PgPool,
) -> Result<(), Box<dyn std::error::Error>> {
    seed_location(&pool, 601404.0, 6644928.0, None, None).await?;
    let store = PgStore::new(pool);

    let result = resolve::handle(
        &store,
        &ResolverSettings::default(),
        ResolveLocationCommand::new(
            LocationInput::coordinates(601504.0, 6644928.0, Crs::Utm33, CoordinateMode::UseNearest),
            stamp(),
        ),
    )
    .await;

    assert!(matches!(
        result,
        Err(ResolveLocationError::NoNearbyLocation { .. })
    ));

    Ok(())
}

// ============================================================================
// Observations
// ============================================================================

#[sqlx::test(migrations = "../../migrations")]
async fn test_submit_writes_event_per_location(
    pool: PgPool,
) -> Result<(), Box<dyn std::error::Error>> {
    let first = seed_location(&pool, 601404.0, 6644928.0, None, None).await?;
    let second = seed_location(&pool, 602404.0, 6644928.0, None, None).await?;
    seed_taxon(&pool, 26165, "Salmo trutta", "species", "Salmonidae").await?;
    seed_taxon(&pool, 26138, "Salmo salar", "species", "Salmonidae").await?;
    let store = PgStore::new(pool.clone());

    let command = SubmitObservationsCommand {
        location_ids: vec![first, second],
        event: event_fields(),
        metadata: metadata(),
        occurrences: vec![occurrence("Salmo trutta"), occurrence("Salmo salar")],
        taxonomic_coverage: vec!["Salmo trutta".to_string(), "Salmo salar".to_string()],
        stamp: stamp(),
    };

    let response = submit::handle(&store, command).await?;

    assert_eq!(response.events.len(), 2);
    assert_eq!(response.occurrence_count(), 4);
    assert_eq!(count_rows(&pool, "nofa.event").await?, 2);
    assert_eq!(count_rows(&pool, "nofa.occurrence").await?, 4);
    assert_eq!(count_rows(&pool, r#"nofa."samplingTaxaRange""#).await?, 4);
    assert_eq!(count_rows(&pool, "plugin.event_log").await?, 2);
    assert_eq!(count_rows(&pool, "plugin.occurrence_log").await?, 4);

    let logged_location = sqlx::query_scalar::<_, String>(
        "SELECT location_id FROM plugin.occurrence_log WHERE occurrence_id = $1",
    )
    .bind(response.events[1].occurrence_ids[0].to_string())
    .fetch_one(&pool)
    .await?;
    assert_eq!(logged_location, second.to_string());

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_submit_unknown_taxon_writes_nothing(
    pool: PgPool,
) -> Result<(), Box<dyn std::error::Error>> {
    let location_id = seed_location(&pool, 601404.0, 6644928.0, None, None).await?;
    let store = PgStore::new(pool.clone());

    let command = SubmitObservationsCommand {
        location_ids: vec![location_id],
        event: event_fields(),
        metadata: metadata(),
        occurrences: vec![occurrence("Esox lucius")],
        taxonomic_coverage: vec![],
        stamp: stamp(),
    };

    let err = submit::handle(&store, command).await.unwrap_err();
    assert!(matches!(
        err,
        SubmitObservationsError::TaxonNotFound {
            committed_events: 0,
            ..
        }
    ));
    assert_eq!(count_rows(&pool, "nofa.event").await?, 0);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_record_full_workflow(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let stored = seed_location(&pool, 601404.0, 6644928.0, Some(3067), None).await?;
    seed_taxon(&pool, 26165, "Salmo trutta", "species", "Salmonidae").await?;
    let store = PgStore::new(pool.clone());

    let command = RecordObservationsCommand {
        locations: vec![
            LocationInput::legacy_code(3067),
            LocationInput::identifier(stored.to_string()),
            LocationInput::coordinates(
                610000.0,
                6650000.0,
                Crs::Utm33,
                CoordinateMode::CreateNew,
            ),
        ],
        event: event_fields(),
        metadata: metadata(),
        occurrences: vec![occurrence("Salmo trutta")],
        taxonomic_coverage: vec![],
        stamp: stamp(),
    };

    let response = record::handle(&store, &ResolverSettings::default(), command).await?;

    assert_eq!(response.locations.len(), 3);
    // The code and the id name the same location, which gets one event
    assert_eq!(response.events.len(), 2);
    assert_eq!(count_rows(&pool, "nofa.location").await?, 2);
    assert_eq!(count_rows(&pool, "nofa.occurrence").await?, 2);

    Ok(())
}
