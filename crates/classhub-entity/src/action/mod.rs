//! Reversible-action domain entities.

pub mod model;
pub mod operation;
pub mod status;

pub use model::{ActionRecord, EntitySnapshot};
pub use operation::ActionType;
pub use status::ActionStatus;
