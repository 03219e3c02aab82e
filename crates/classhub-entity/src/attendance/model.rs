//! Attendance entry entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use classhub_core::types::id::{EntityId, UserId};
use classhub_core::types::kind::EntityKind;
use classhub_core::{AppError, AppResult};

use crate::record::EntityRecord;

use super::status::AttendanceStatus;

/// One student's attendance state on one date.
///
/// Status changes on these rows are the high-frequency, low-risk
/// mutations that go through the optimistic coordinator rather than the
/// action log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceEntry {
    /// Unique entry identifier.
    pub id: EntityId,
    /// The teacher who recorded the entry.
    pub owner_id: UserId,
    /// The student the entry is about.
    pub student_id: EntityId,
    /// The class the entry was taken in, if any.
    pub class_id: Option<EntityId>,
    /// The school day the entry covers.
    pub date: NaiveDate,
    /// Recorded attendance state.
    pub status: AttendanceStatus,
    /// Free-form note, e.g. the reason for an excused absence.
    pub note: Option<String>,
}

impl AttendanceEntry {
    /// The collection attendance entries are stored under.
    pub const KIND: EntityKind = EntityKind::Attendance;

    /// Copy of this entry with a different status.
    ///
    /// Used to build the predicted value for an optimistic status
    /// toggle without touching the original.
    pub fn with_status(&self, status: AttendanceStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Serialize into a storable row.
    pub fn into_record(self, now: DateTime<Utc>) -> AppResult<EntityRecord> {
        let payload = serde_json::to_value(&self)?;
        Ok(EntityRecord::new(
            self.id,
            Self::KIND,
            self.owner_id,
            payload,
            now,
        ))
    }

    /// Deserialize from a stored row.
    pub fn from_record(record: &EntityRecord) -> AppResult<Self> {
        if record.kind != Self::KIND {
            return Err(AppError::validation(format!(
                "Expected an {} record, got {}",
                Self::KIND,
                record.kind
            )));
        }
        Ok(serde_json::from_value(record.payload.clone())?)
    }
}
