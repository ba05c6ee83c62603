//! `nofa-insert history` and `nofa-insert users` command implementations

use colored::Colorize;

use super::{print_json, print_list};
use crate::audit::{self, HistoryEntry, HistoryQuery};
use crate::cli::HistoryArgs;
use crate::config::Config;
use crate::db;
use crate::error::{AppError, Result};

impl TryFrom<&HistoryArgs> for HistoryQuery {
    type Error = AppError;

    fn try_from(args: &HistoryArgs) -> Result<Self> {
        for (from, to, what) in [
            (args.inserted_from, args.inserted_to, "inserted"),
            (args.updated_from, args.updated_to, "updated"),
        ] {
            if let (Some(from), Some(to)) = (from, to) {
                if to < from {
                    return Err(AppError::invalid_argument(format!(
                        "--{what}-to ({to}) is before --{what}-from ({from})"
                    )));
                }
            }
        }

        let mut query = HistoryQuery::new(args.kind)
            .inserted_between(args.inserted_from, args.inserted_to)
            .updated_between(args.updated_from, args.updated_to);
        if let Some(user) = &args.user {
            query = query.username(user.clone());
        }
        if let Some(limit) = args.limit {
            query = query.limit(limit);
        }
        Ok(query)
    }
}

fn format_entry(entry: &HistoryEntry) -> String {
    let timestamp = |t: Option<chrono::NaiveDateTime>| {
        t.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let test = if entry.test.unwrap_or(false) { " [test]" } else { "" };
    let links: String = entry
        .links()
        .into_iter()
        .map(|(column, value)| format!("  {column}={value}"))
        .collect();

    format!(
        "{}  {}  inserted {}  updated {}{links}{test}",
        entry.entity_id,
        entry.username,
        timestamp(entry.insert_timestamp),
        timestamp(entry.update_timestamp),
    )
}

pub async fn run(config: &Config, args: &HistoryArgs, json: bool) -> Result<()> {
    let query = HistoryQuery::try_from(args)?;

    let pool = db::connect(config).await?;
    let entries = audit::query_history(&pool, &query).await?;

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No {} log rows found.", query.kind);
        return Ok(());
    }

    println!("{}", format!("{} history:", query.kind).cyan().bold());
    for entry in &entries {
        println!("  {}", format_entry(entry));
    }
    Ok(())
}

pub async fn users(config: &Config, json: bool) -> Result<()> {
    let pool = db::connect(config).await?;
    let users = audit::list_active_users(&pool).await?;
    print_list("Active users", &users, json)
}
