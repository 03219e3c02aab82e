//! Reversible-action lifecycle events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{ActionId, UserId};
use crate::types::kind::EntityKind;

/// Events covering the lifecycle of a recorded reversible action.
///
/// `Recorded` carries everything the notification surface needs to show
/// an undo affordance with a countdown; the wall-clock `expires_at` is
/// the countdown target, the authoritative check stays server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActionEvent {
    /// A reversible action was recorded.
    Recorded {
        /// The action ID.
        action_id: ActionId,
        /// The user who performed the action.
        user_id: UserId,
        /// The collection the action touched.
        entity_kind: EntityKind,
        /// Number of affected rows.
        affected: usize,
        /// Human-readable description for the toast.
        description: String,
        /// When the undo window closes.
        expires_at: DateTime<Utc>,
    },
    /// An action was undone within its window.
    Undone {
        /// The action ID.
        action_id: ActionId,
        /// The user who undid it.
        user_id: UserId,
    },
    /// An action's window closed without an undo.
    Expired {
        /// The action ID.
        action_id: ActionId,
        /// The user who performed the original action.
        user_id: UserId,
    },
}

impl ActionEvent {
    /// The action this event refers to.
    pub fn action_id(&self) -> ActionId {
        match self {
            Self::Recorded { action_id, .. }
            | Self::Undone { action_id, .. }
            | Self::Expired { action_id, .. } => *action_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_tagging() {
        let event = ActionEvent::Undone {
            action_id: ActionId::new(),
            user_id: UserId::new(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Undone");
    }

    #[test]
    fn test_action_id_accessor() {
        let id = ActionId::new();
        let event = ActionEvent::Expired {
            action_id: id,
            user_id: UserId::new(),
        };
        assert_eq!(event.action_id(), id);
    }
}
