//! # classhub-cache
//!
//! Read-cache layer for ClassHub. [`MemoryEntityCache`] implements the
//! `EntityCache` capability from `classhub-core` on top of
//! [moka](https://crates.io/crates/moka), with per-key generation
//! counters so in-flight refetches can be cancelled before an
//! optimistic patch lands.
//!
//! All cache keys are built in [`keys`]; nothing else in the workspace
//! formats a key by hand.

pub mod keys;
pub mod memory;

pub use memory::{MemoryEntityCache, RefetchTicket};
