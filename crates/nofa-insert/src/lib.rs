//! NOFA Insert Library
//!
//! Records fish occurrence observations in the NOFA PostgreSQL/PostGIS
//! database.
//!
//! # Overview
//!
//! - **Location resolution**: map location ids, coordinates or legacy lake
//!   codes to stored locations, creating new ones on request
//!   ([`features::locations`])
//! - **Observation writing**: one event per location with its occurrences,
//!   taxonomic coverage and audit rows ([`features::observations`])
//! - **Lookups**: taxa, ecotypes and the other choice lists
//!   ([`features::lookups`])
//! - **Audit history**: browse the `plugin.*_log` tables ([`audit`])
//!
//! All database access from the workflow goes through [`store::NofaStore`].

pub mod audit;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod store;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{AppError, FaultKind, Result};
pub use store::{NofaStore, PgStore};
