//! # classhub-service
//!
//! Business logic layer for ClassHub. The services in this crate carry
//! the portal's reversible-mutation semantics: the action log with its
//! bounded undo window, owner-scoped soft delete and restore, the
//! sequential bulk executor with partial-failure reporting, and the
//! optimistic mutation coordinator over the read cache.
//!
//! Services take their dependencies as `Arc` references at construction
//! time.

pub mod bulk;
pub mod context;
pub mod history;
pub mod optimistic;
pub mod soft_delete;
pub mod undo;

pub use bulk::{BulkOptions, execute_bulk};
pub use context::RequestContext;
pub use history::{FilterDraft, UndoRedoStack};
pub use optimistic::{MutationOutcome, OptimisticMutationCoordinator};
pub use soft_delete::SoftDeleteService;
pub use undo::{UndoManager, UndoableDelete};
