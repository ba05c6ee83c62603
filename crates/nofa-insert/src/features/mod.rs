//! Feature modules
//!
//! Each feature keeps its commands (writes) and queries (reads) in separate
//! submodules. Handlers are plain async functions taking the store or pool
//! they need.
//!
//! - **locations**: resolving location inputs, searching stored locations
//! - **observations**: writing events and occurrences
//! - **lookups**: lookup lists for choice fields
//! - **shared**: field normalisation and validation helpers

pub mod locations;
pub mod lookups;
pub mod observations;
pub mod shared;
