//! Sequential bulk operation execution.

pub mod executor;

pub use executor::{BulkOptions, execute_bulk};
