//! Student entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classhub_core::types::id::{EntityId, UserId};
use classhub_core::types::kind::EntityKind;
use classhub_core::{AppError, AppResult};

use crate::record::EntityRecord;

/// A student on a teacher's roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    pub id: EntityId,
    /// The teacher who owns this roster entry.
    pub owner_id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// The class the student is assigned to, if any.
    pub class_id: Option<EntityId>,
    /// Contact email for the student or guardian.
    pub email: Option<String>,
}

impl Student {
    /// The collection students are stored under.
    pub const KIND: EntityKind = EntityKind::Students;

    /// Display name, family name last.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
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
                "Expected a {} record, got {}",
                Self::KIND,
                record.kind
            )));
        }
        Ok(serde_json::from_value(record.payload.clone())?)
    }
}
