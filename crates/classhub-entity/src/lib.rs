//! # classhub-entity
//!
//! Domain entity models for ClassHub. Every struct in this crate
//! represents a stored row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod action;
pub mod attendance;
pub mod class;
pub mod record;
pub mod student;
pub mod task;

pub use record::EntityRecord;
