//! Domain events emitted by ClassHub operations.
//!
//! Events are broadcast by the undo manager and consumed by the
//! notification surface (undo toasts with countdowns) and audit logging.

pub mod action;

pub use action::ActionEvent;
