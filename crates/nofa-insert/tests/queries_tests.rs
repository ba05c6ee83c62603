//! Read-only queries: location search, lookup lists and audit history

use nofa_insert::audit::{query_history, AuditKind, HistoryQuery};
use nofa_insert::db;
use nofa_insert::features::locations::queries::search::{
    self, list_counties, list_country_codes, list_municipalities,
};
use nofa_insert::features::locations::{LocationInput, ResolverSettings, SearchLocationsQuery};
use nofa_insert::features::locations::{CoordinateMode, Crs, ResolveLocationCommand};
use nofa_insert::features::locations::commands::resolve;
use nofa_insert::features::lookups::queries::{
    family_tree, list_ecotypes, list_taxa, list_values, occurrence_defaults, LookupList,
};
use nofa_insert::PgStore;
use sqlx::PgPool;

mod common;

use common::{seed_ecotype, seed_location, seed_taxon, stamp};

#[sqlx::test(migrations = "../../migrations")]
async fn test_migrated_database_is_nofa(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
    db::check_nofa_tables(&pool).await?;
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_search_locations_filters(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let lake = seed_location(&pool, 601404.0, 6644928.0, None, Some("Maridalsvannet")).await?;
    seed_location(&pool, 602404.0, 6644928.0, None, Some("Sognsvann")).await?;

    let response = search::handle(
        &pool,
        SearchLocationsQuery {
            water_body: Some("dals".to_string()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(response.items.len(), 1);
    assert_eq!(response.items[0].location_id, lake);

    let everything = search::handle(
        &pool,
        SearchLocationsQuery {
            water_body: Some("<all>".to_string()),
            county: Some("Oslo".to_string()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(everything.items.len(), 2);

    let limited = search::handle(
        &pool,
        SearchLocationsQuery {
            limit: Some(1),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(limited.items.len(), 1);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_administrative_lists(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
    seed_location(&pool, 601404.0, 6644928.0, None, Some("Maridalsvannet")).await?;

    assert_eq!(list_country_codes(&pool).await?, vec!["NO".to_string()]);
    assert_eq!(list_counties(&pool, Some("NO")).await?, vec!["Oslo".to_string()]);
    assert!(list_counties(&pool, Some("SE")).await?.is_empty());
    assert_eq!(
        list_municipalities(&pool, Some("NO"), Some("Oslo")).await?,
        vec!["Oslo".to_string()]
    );

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_taxa_lookups(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
    seed_taxon(&pool, 26165, "Salmo trutta", "species", "Salmonidae").await?;
    seed_taxon(&pool, 26100, "Salmonidae", "family", "Salmonidae").await?;
    seed_taxon(&pool, 26181, "Esox lucius", "species", "Esocidae").await?;
    seed_ecotype(&pool, 1, 26165, "sjøaure").await?;

    assert_eq!(
        list_taxa(&pool).await?,
        vec!["Esox lucius".to_string(), "Salmo trutta".to_string()]
    );
    assert_eq!(
        list_ecotypes(&pool, "Salmo trutta").await?,
        vec!["sjøaure".to_string()]
    );

    let tree = family_tree(&pool).await?;
    assert_eq!(tree.families().collect::<Vec<_>>(), vec!["Esocidae", "Salmonidae"]);
    assert_eq!(tree.taxa("Esocidae").to_vec(), vec!["Esox lucius".to_string()]);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_lookup_lists_and_defaults(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
    sqlx::query(
        r#"INSERT INTO nofa."l_occurrenceStatus" ("occurrenceStatus") VALUES ('present'), ('absent')"#,
    )
    .execute(&pool)
    .await?;

    assert_eq!(
        list_values(&pool, LookupList::OccurrenceStatus).await?,
        vec!["absent".to_string(), "present".to_string()]
    );
    assert!(list_values(&pool, LookupList::Reliability).await?.is_empty());

    let defaults = occurrence_defaults(&pool).await?;
    assert_eq!(defaults.occurrence_status.as_deref(), Some("present"));
    assert_eq!(defaults.establishment_means.as_deref(), Some("native"));

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_history_after_location_insert(
    pool: PgPool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = PgStore::new(pool.clone());
    let created = resolve::handle(
        &store,
        &ResolverSettings::default(),
        ResolveLocationCommand::new(
            LocationInput::coordinates(601404.0, 6644928.0, Crs::Utm33, CoordinateMode::CreateNew),
            stamp(),
        ),
    )
    .await?;

    let rows = query_history(&pool, &HistoryQuery::new(AuditKind::Location).username("test%"))
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].entity_id, created.location_id.to_string());
    assert_eq!(rows[0].username, "tester");
    assert_eq!(rows[0].test, Some(true));
    // Unnamed location; the other link columns are NULL for this log
    assert!(rows[0].links().is_empty());

    let nobody = query_history(&pool, &HistoryQuery::new(AuditKind::Location).username("ola%"))
        .await?;
    assert!(nobody.is_empty());

    Ok(())
}
