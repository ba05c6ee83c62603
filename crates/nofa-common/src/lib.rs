//! NOFA Common Library
//!
//! Shared utilities and error handling for the NOFA insert tooling.
//!
//! # Overview
//!
//! - **Error Handling**: [`NofaError`] for setting and code parse failures
//! - **Logging**: tracing subscriber setup driven by environment variables
//! - **Ordered sets**: insertion-ordered de-duplication of user input
//!
//! # Example
//!
//! ```no_run
//! use nofa_common::ordered_set::OrderedSet;
//!
//! let codes: OrderedSet<i32> = [3067, 5616, 3067].into_iter().collect();
//! assert_eq!(codes.into_vec(), vec![3067, 5616]);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;
pub mod ordered_set;

pub use error::NofaError;
pub use ordered_set::OrderedSet;
