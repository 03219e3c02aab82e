//! Local edit-history configuration.

use serde::{Deserialize, Serialize};

/// Settings for in-memory undo/redo stacks (form drafts, filter state).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of past states retained per stack. The oldest state
    /// is dropped when the bound is exceeded.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

fn default_max_entries() -> usize {
    50
}
