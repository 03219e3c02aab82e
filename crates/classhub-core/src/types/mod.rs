//! Core type definitions used across the ClassHub workspace.

pub mod bulk;
pub mod id;
pub mod kind;
pub mod visibility;

pub use bulk::{BulkFailure, BulkReport};
pub use id::*;
pub use kind::EntityKind;
pub use visibility::Visibility;
