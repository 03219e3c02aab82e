//! In-memory edit history for purely local state.

pub mod draft;
pub mod stack;

pub use draft::FilterDraft;
pub use stack::UndoRedoStack;
