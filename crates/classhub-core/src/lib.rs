//! # classhub-core
//!
//! Core crate for ClassHub. Contains traits, configuration schemas,
//! typed identifiers, domain events, the bulk report types, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other ClassHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
