//! Owner-scoped soft delete and restore.

pub mod service;

pub use service::SoftDeleteService;
