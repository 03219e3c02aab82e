//! Action record entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use classhub_core::types::id::{ActionId, EntityId, UserId};
use classhub_core::types::kind::EntityKind;

use super::operation::ActionType;
use super::status::ActionStatus;

/// Prior payload of one affected row, captured for update reversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// The row the payload belonged to.
    pub id: EntityId,
    /// The payload as it was before the action.
    pub payload: serde_json::Value,
}

/// One recorded reversible action.
///
/// Records are immutable except for `status`, which moves from
/// `Pending` to exactly one of `Undone` or `Expired`. `expires_at` is
/// fixed at creation; expiry is checked lazily against it, never by a
/// background timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Unique action identifier.
    pub id: ActionId,
    /// The user who performed the action.
    pub user_id: UserId,
    /// What kind of operation the action reverses.
    pub action_type: ActionType,
    /// The collection the action touched.
    pub entity_kind: EntityKind,
    /// The affected rows, in operation order. Never empty.
    pub affected_ids: Vec<EntityId>,
    /// Prior payloads, present when the action type needs them.
    pub snapshot: Option<Vec<EntitySnapshot>>,
    /// Human-readable description, e.g. `"Deleted 3 students"`.
    pub description: String,
    /// When the action was recorded.
    pub created_at: DateTime<Utc>,
    /// When the undo window closes.
    pub expires_at: DateTime<Utc>,
    /// Current lifecycle status.
    pub status: ActionStatus,
}

impl ActionRecord {
    /// Create a new pending record whose window opens at `created_at`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: UserId,
        action_type: ActionType,
        entity_kind: EntityKind,
        affected_ids: Vec<EntityId>,
        snapshot: Option<Vec<EntitySnapshot>>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
        window: Duration,
    ) -> Self {
        Self {
            id: ActionId::new(),
            user_id,
            action_type,
            entity_kind,
            affected_ids,
            snapshot,
            description: description.into(),
            created_at,
            expires_at: created_at + window,
            status: ActionStatus::Pending,
        }
    }

    /// Check whether the record is still pending.
    pub fn is_pending(&self) -> bool {
        self.status == ActionStatus::Pending
    }

    /// Check whether the undo window has closed at the given instant.
    ///
    /// `expires_at` itself is outside the window.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// How much of the window remains at the given instant, floored at
    /// zero.
    pub fn remaining_window(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(window_seconds: i64) -> ActionRecord {
        ActionRecord::new(
            UserId::new(),
            ActionType::Delete,
            EntityKind::Students,
            vec![EntityId::new()],
            None,
            "Deleted 1 student",
            Utc::now(),
            Duration::seconds(window_seconds),
        )
    }

    #[test]
    fn test_new_record_is_pending() {
        let rec = record(10);
        assert!(rec.is_pending());
        assert_eq!(rec.expires_at - rec.created_at, Duration::seconds(10));
    }

    #[test]
    fn test_expiry_boundary() {
        let rec = record(10);
        assert!(!rec.is_expired(rec.created_at));
        assert!(!rec.is_expired(rec.expires_at - Duration::milliseconds(1)));
        assert!(rec.is_expired(rec.expires_at));
        assert!(rec.is_expired(rec.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_remaining_window_floors_at_zero() {
        let rec = record(10);
        assert_eq!(
            rec.remaining_window(rec.created_at),
            Duration::seconds(10)
        );
        assert_eq!(
            rec.remaining_window(rec.expires_at + Duration::seconds(5)),
            Duration::zero()
        );
    }
}
