//! Locations
//!
//! Turning user-entered location descriptors into stored location ids, and
//! searching the locations already in the database.

pub mod commands;
pub mod parse;
pub mod queries;
pub mod types;

pub use commands::{
    ResolutionOutcome, ResolveLocationCommand, ResolveLocationError, ResolveLocationResponse,
};
pub use parse::{parse_coordinates, parse_identifiers, parse_legacy_codes, LocationBatchError};
pub use queries::{SearchLocationsError, SearchLocationsQuery, SearchLocationsResponse};
pub use types::{CoordinateMode, Crs, LocationInput, Point, ResolverSettings};
