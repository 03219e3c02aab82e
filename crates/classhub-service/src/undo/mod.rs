//! The reversible-action log.

pub mod manager;

pub use manager::{UndoManager, UndoableDelete};
