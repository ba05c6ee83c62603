//! Read-only lists that populate choice fields

pub mod queries;

pub use queries::{FamilyTree, LookupList, OccurrenceDefaults};
