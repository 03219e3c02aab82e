//! # classhub-store
//!
//! Storage port and adapters for ClassHub entity rows. The
//! [`EntityStore`] trait is the boundary the managed backend sits
//! behind; [`MemoryEntityStore`] is the in-process adapter used in
//! development and tests.
//!
//! The port deals in whole [`classhub_entity::EntityRecord`] rows and
//! timestamps supplied by the caller; ownership checks, visibility
//! defaults, and clock reads all live in the service layer.

pub mod memory;
pub mod traits;

pub use memory::MemoryEntityStore;
pub use traits::EntityStore;
