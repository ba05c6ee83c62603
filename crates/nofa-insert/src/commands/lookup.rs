//! `nofa-insert lookup` command implementation

use colored::Colorize;

use super::{print_json, print_list};
use crate::cli::LookupCommand;
use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::features::locations::queries::search;
use crate::features::lookups::queries as lookups;

pub async fn run(config: &Config, command: &LookupCommand, json: bool) -> Result<()> {
    let pool = db::connect(config).await?;

    match command {
        LookupCommand::Taxa => print_list("Taxa", &lookups::list_taxa(&pool).await?, json),
        LookupCommand::Ecotypes { taxon } => print_list(
            &format!("Ecotypes of {taxon}"),
            &lookups::list_ecotypes(&pool, taxon).await?,
            json,
        ),
        LookupCommand::Families => {
            let tree = lookups::family_tree(&pool).await?;
            if json {
                return print_json(&tree);
            }
            for family in tree.families() {
                println!("{}", family.cyan().bold());
                for taxon in tree.taxa(family) {
                    println!("  {taxon}");
                }
            }
            Ok(())
        },
        LookupCommand::List { list } => print_list(
            list.column(),
            &lookups::list_values(&pool, *list).await?,
            json,
        ),
        LookupCommand::Datasets => {
            let items = lookups::list_datasets(&pool).await?;
            if json {
                return print_json(&items);
            }
            print_list("Datasets", &display_strings(&items), json)
        },
        LookupCommand::Projects => {
            let items = lookups::list_projects(&pool).await?;
            if json {
                return print_json(&items);
            }
            print_list("Projects", &display_strings(&items), json)
        },
        LookupCommand::References => {
            let items = lookups::list_references(&pool).await?;
            if json {
                return print_json(&items);
            }
            print_list("References", &display_strings(&items), json)
        },
        LookupCommand::Defaults => {
            let defaults = lookups::occurrence_defaults(&pool).await?;
            if json {
                return print_json(&defaults);
            }
            let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
            println!("Occurrence status:   {}", show(&defaults.occurrence_status));
            println!("Establishment means: {}", show(&defaults.establishment_means));
            Ok(())
        },
        LookupCommand::Countries => print_list(
            "Country codes",
            &search::list_country_codes(&pool).await?,
            json,
        ),
        LookupCommand::Counties { country_code } => print_list(
            "Counties",
            &search::list_counties(&pool, country_code.as_deref()).await?,
            json,
        ),
        LookupCommand::Municipalities {
            country_code,
            county,
        } => print_list(
            "Municipalities",
            &search::list_municipalities(&pool, country_code.as_deref(), county.as_deref())
                .await?,
            json,
        ),
    }
}

fn display_strings<T: ToString>(items: &[T]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
