//! Soft-deletable entity row envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classhub_core::types::id::{EntityId, UserId};
use classhub_core::types::kind::EntityKind;

/// One stored row of any portal collection.
///
/// The envelope carries the columns every collection shares (owner,
/// kind, timestamps, soft-delete marker); the collection-specific fields
/// live in `payload` as a JSON document. Deleting a row never removes
/// it, it only sets `deleted_at`; every default read filters on that
/// marker being unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Unique row identifier.
    pub id: EntityId,
    /// The collection this row belongs to.
    pub kind: EntityKind,
    /// The user who owns the row.
    pub owner_id: UserId,
    /// Collection-specific fields as a JSON document.
    pub payload: serde_json::Value,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. Unset for active rows.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl EntityRecord {
    /// Create a new active row.
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        owner_id: UserId,
        payload: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            owner_id,
            payload,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Check whether the row is visible on default read paths.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Check whether the row is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Set the soft-delete marker. Already-deleted rows keep their
    /// original deletion timestamp.
    pub fn mark_deleted(&mut self, at: DateTime<Utc>) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(at);
            self.updated_at = at;
        }
    }

    /// Clear the soft-delete marker. Active rows are left untouched.
    pub fn clear_deleted(&mut self, at: DateTime<Utc>) {
        if self.deleted_at.is_some() {
            self.deleted_at = None;
            self.updated_at = at;
        }
    }

    /// Replace the payload document.
    pub fn set_payload(&mut self, payload: serde_json::Value, at: DateTime<Utc>) {
        self.payload = payload;
        self.updated_at = at;
    }
}
