//! Class domain entities.

pub mod model;

pub use model::SchoolClass;
