//! Command implementations
//!
//! Each subcommand has a `run` function that connects on demand, calls the
//! feature handlers and prints the outcome.

pub mod check;
pub mod history;
pub mod lookup;
pub mod record;
pub mod resolve;
pub mod search;

use colored::Colorize;
use serde::Serialize;

use crate::error::Result;

/// Print `value` as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a titled list, one value per line
pub(crate) fn print_list(title: &str, values: &[String], json: bool) -> Result<()> {
    if json {
        return print_json(values);
    }

    if values.is_empty() {
        println!("No {} found.", title.to_lowercase());
        return Ok(());
    }

    println!("{}", format!("{title}:").cyan().bold());
    for value in values {
        println!("  {value}");
    }
    Ok(())
}
