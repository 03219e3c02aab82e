//! Optimistic cache mutation with reconcile and rollback.

pub mod coordinator;

pub use coordinator::{MutationOutcome, OptimisticMutationCoordinator};
