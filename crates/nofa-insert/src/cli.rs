//! Command-line definitions

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::audit::AuditKind;
use crate::features::locations::{CoordinateMode, Crs};
use crate::features::lookups::LookupList;

/// NOFA Insert - record fish occurrences in the NOFA database
#[derive(Parser, Debug)]
#[command(name = "nofa-insert")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the connection and the NOFA schema
    Check,

    /// Apply the bundled schema migrations (development and test databases)
    Migrate,

    /// Resolve location inputs to location IDs
    Resolve(ResolveArgs),

    /// Record observations from a submission file
    Record {
        /// Submission file (JSON)
        file: PathBuf,

        /// Validate only; nothing is written
        #[arg(long)]
        dry_run: bool,
    },

    /// Show audit log history
    History(HistoryArgs),

    /// Show database users with a valid login
    Users,

    /// Show lookup lists
    Lookup {
        #[command(subcommand)]
        command: LookupCommand,
    },

    /// Search stored locations
    SearchLocations(SearchArgs),
}

/// Exactly one of `--ids`, `--coordinates` or `--codes`
#[derive(Args, Debug)]
#[group(required = true, multiple = false, id = "locations")]
pub struct LocationBatchArgs {
    /// Comma-separated location IDs
    #[arg(long)]
    pub ids: Option<String>,

    /// Comma-separated "<x> <y> [name]" items
    #[arg(long)]
    pub coordinates: Option<String>,

    /// Comma-separated legacy lake codes
    #[arg(long)]
    pub codes: Option<String>,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub batch: LocationBatchArgs,

    /// CRS of --coordinates (UTM32, UTM33 or EPSG:<code>)
    #[arg(long, default_value = "UTM33")]
    pub crs: Crs,

    /// What to do with --coordinates: "nearest" or "new"
    #[arg(long, default_value = "nearest")]
    pub mode: CoordinateMode,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Log to read: location, event, occurrence, dataset, project, reference
    pub kind: AuditKind,

    /// Username pattern (SQL LIKE)
    #[arg(short, long)]
    pub user: Option<String>,

    #[arg(long)]
    pub inserted_from: Option<NaiveDate>,

    #[arg(long)]
    pub inserted_to: Option<NaiveDate>,

    #[arg(long)]
    pub updated_from: Option<NaiveDate>,

    #[arg(long)]
    pub updated_to: Option<NaiveDate>,

    /// Maximum rows to show
    #[arg(short, long)]
    pub limit: Option<i64>,
}

#[derive(Subcommand, Debug)]
pub enum LookupCommand {
    /// Selectable taxa
    Taxa,

    /// Ecotypes of a taxon
    Ecotypes {
        /// Scientific name
        taxon: String,
    },

    /// Taxa grouped by family
    Families,

    /// Values of a lookup table
    List {
        #[arg(value_enum)]
        list: LookupList,
    },

    Datasets,

    Projects,

    References,

    /// Default occurrence status and establishment means
    Defaults,

    /// Country codes of stored locations
    Countries,

    /// Counties of stored locations
    Counties {
        #[arg(long)]
        country_code: Option<String>,
    },

    /// Municipalities of stored locations
    Municipalities {
        #[arg(long)]
        country_code: Option<String>,

        #[arg(long)]
        county: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Part of the water body name
    #[arg(long)]
    pub water_body: Option<String>,

    #[arg(long)]
    pub country_code: Option<String>,

    #[arg(long)]
    pub county: Option<String>,

    #[arg(long)]
    pub municipality: Option<String>,

    #[arg(short, long)]
    pub limit: Option<i64>,
}
