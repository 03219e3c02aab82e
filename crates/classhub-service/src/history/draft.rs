//! Table filter draft, the portal's main undo/redo stack payload.

use serde::{Deserialize, Serialize};

use classhub_core::types::id::EntityId;
use classhub_core::types::visibility::Visibility;

use super::stack::UndoRedoStack;

/// Filter state of a roster or task table.
///
/// Edits to this draft are local and synchronous, so the table screens
/// keep it in an [`UndoRedoStack`] and wire the stack to their
/// undo/redo shortcuts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDraft {
    /// Free-text search over names and titles.
    pub query: String,
    /// Restrict to one class.
    pub class_id: Option<EntityId>,
    /// Which rows to show with respect to soft delete.
    pub visibility: Visibility,
}

impl FilterDraft {
    /// An empty draft in a history stack of the given depth.
    pub fn stack(max_history: usize) -> UndoRedoStack<FilterDraft> {
        UndoRedoStack::new(FilterDraft::default(), max_history)
    }
}
