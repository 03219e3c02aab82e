//! In-memory cache implementation.

pub mod store;

pub use store::{MemoryEntityCache, RefetchTicket};
