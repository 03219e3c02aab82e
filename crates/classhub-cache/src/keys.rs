//! Cache key builders for all ClassHub cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use chrono::NaiveDate;

use classhub_core::types::id::{EntityId, UserId};
use classhub_core::types::kind::EntityKind;

/// Prefix applied to all ClassHub cache keys.
const PREFIX: &str = "classhub";

// ── Entity row keys ────────────────────────────────────────

/// Cache key for a single entity row by kind and id.
pub fn entity_by_id(kind: EntityKind, id: EntityId) -> String {
    format!("{PREFIX}:{kind}:{id}")
}

/// Cache key for an owner's active-row listing of one kind.
pub fn entity_list(kind: EntityKind, owner_id: UserId) -> String {
    format!("{PREFIX}:{kind}:owner:{owner_id}")
}

// ── Attendance keys ────────────────────────────────────────

/// Cache key for one student's attendance entry on one date.
///
/// This is the mutation key the optimistic coordinator uses when a
/// teacher toggles a status in the attendance grid.
pub fn attendance_entry(student_id: EntityId, date: NaiveDate) -> String {
    format!("{PREFIX}:attendance:{student_id}:{date}")
}

/// Cache key for a class's full attendance grid on one date.
pub fn attendance_day(class_id: EntityId, date: NaiveDate) -> String {
    format!("{PREFIX}:attendance:day:{class_id}:{date}")
}
