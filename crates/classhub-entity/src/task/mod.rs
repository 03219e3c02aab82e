//! Task domain entities.

pub mod model;

pub use model::Task;
