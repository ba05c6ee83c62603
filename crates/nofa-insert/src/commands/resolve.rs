//! `nofa-insert resolve` command implementation

use colored::Colorize;

use super::print_json;
use crate::cli::{LocationBatchArgs, ResolveArgs};
use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::features::locations::commands::resolve;
use crate::features::locations::{
    parse_coordinates, parse_identifiers, parse_legacy_codes, CoordinateMode, Crs,
    LocationBatchError, LocationInput, ResolutionOutcome, ResolveLocationCommand,
};
use crate::store::PgStore;

/// Location inputs from whichever batch option was given
pub fn batch_inputs(
    batch: &LocationBatchArgs,
    crs: Crs,
    mode: CoordinateMode,
) -> std::result::Result<Vec<LocationInput>, LocationBatchError> {
    if let Some(ids) = &batch.ids {
        parse_identifiers(ids)
    } else if let Some(coordinates) = &batch.coordinates {
        parse_coordinates(coordinates, crs, mode)
    } else if let Some(codes) = &batch.codes {
        parse_legacy_codes(codes)
    } else {
        Err(LocationBatchError::NoLocation)
    }
}

/// Resolve each location of a batch, stopping at the first failure
pub async fn run(config: &Config, args: &ResolveArgs, json: bool) -> Result<()> {
    let inputs = batch_inputs(&args.batch, args.crs, args.mode)?;

    let pool = db::connect(config).await?;
    let store = PgStore::new(pool);
    let settings = config.resolver_settings();
    let stamp = config.audit_stamp();

    let mut responses = Vec::with_capacity(inputs.len());
    for input in inputs {
        let response =
            resolve::handle(&store, &settings, ResolveLocationCommand::new(input, stamp.clone()))
                .await?;
        responses.push(response);
    }

    if json {
        return print_json(&responses);
    }

    for response in &responses {
        let outcome = match response.outcome {
            ResolutionOutcome::Matched => "matched".to_string(),
            ResolutionOutcome::Created => "created".green().to_string(),
            ResolutionOutcome::Nearest { distance } => format!("nearest, {distance:.1} m away"),
        };
        println!("{} ({outcome})", response.location_id);
    }
    Ok(())
}
