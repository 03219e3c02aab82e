//! Core traits defined in `classhub-core` and implemented by other crates.

pub mod cache;
pub mod clock;

pub use cache::EntityCache;
pub use clock::{Clock, ManualClock, SystemClock};
