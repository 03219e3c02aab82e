//! Reversible action type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of operation a recorded action reverses.
///
/// The set is closed on purpose: the inverse dispatch matches over it
/// exhaustively, so a new action type cannot be added without deciding
/// its inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// A single row was soft-deleted.
    Delete,
    /// Several rows were soft-deleted in one gesture.
    BulkDelete,
    /// A row's payload was overwritten.
    Update,
    /// A previously deleted row was restored.
    Restore,
}

impl ActionType {
    /// Return the action type as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::BulkDelete => "bulk_delete",
            Self::Update => "update",
            Self::Restore => "restore",
        }
    }

    /// Whether undoing this action needs the prior payloads.
    pub fn requires_snapshot(&self) -> bool {
        matches!(self, Self::Update)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = classhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "delete" => Ok(Self::Delete),
            "bulk_delete" => Ok(Self::BulkDelete),
            "update" => Ok(Self::Update),
            "restore" => Ok(Self::Restore),
            _ => Err(classhub_core::AppError::validation(format!(
                "Invalid action type: '{s}'. Expected one of: delete, bulk_delete, update, restore"
            ))),
        }
    }
}
