//! `nofa-insert search-locations` command implementation

use colored::Colorize;

use super::print_json;
use crate::cli::SearchArgs;
use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::features::locations::queries::search;
use crate::features::locations::SearchLocationsQuery;

impl From<&SearchArgs> for SearchLocationsQuery {
    fn from(args: &SearchArgs) -> Self {
        Self {
            water_body: args.water_body.clone(),
            country_code: args.country_code.clone(),
            county: args.county.clone(),
            municipality: args.municipality.clone(),
            limit: args.limit,
        }
    }
}

pub async fn run(config: &Config, args: &SearchArgs, json: bool) -> Result<()> {
    let query = SearchLocationsQuery::from(args);
    query.validate()?;

    let pool = db::connect(config).await?;
    let response = search::handle(&pool, query).await?;

    if json {
        return print_json(&response.items);
    }

    if response.items.is_empty() {
        println!("No locations found.");
        return Ok(());
    }

    for item in &response.items {
        println!(
            "{}  {}  {} / {}",
            item.location_id,
            item.water_body.as_deref().unwrap_or("-").green(),
            item.county.as_deref().unwrap_or("-"),
            item.municipality.as_deref().unwrap_or("-"),
        );
    }
    println!();
    println!("{} location(s)", response.items.len());
    Ok(())
}
