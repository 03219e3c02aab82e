//! Read-path visibility filter for soft-deleted rows.

use serde::{Deserialize, Serialize};

/// Which rows a read should see with respect to the soft-delete marker.
///
/// `Active` is the default everywhere; deleted rows only surface when a
/// caller asks for them explicitly (trash views, restore pickers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Only rows whose `deleted_at` is unset.
    #[default]
    Active,
    /// Only rows whose `deleted_at` is set.
    Deleted,
    /// Every row regardless of the marker.
    All,
}

impl Visibility {
    /// Whether a row with the given deletion marker passes this filter.
    pub fn admits(&self, deleted: bool) -> bool {
        match self {
            Self::Active => !deleted,
            Self::Deleted => deleted,
            Self::All => true,
        }
    }
}
