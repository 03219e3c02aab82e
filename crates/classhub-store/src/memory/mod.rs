//! In-memory entity store adapter.

pub mod store;

pub use store::MemoryEntityStore;
