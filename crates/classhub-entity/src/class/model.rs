//! Class entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classhub_core::types::id::{EntityId, UserId};
use classhub_core::types::kind::EntityKind;
use classhub_core::{AppError, AppResult};

use crate::record::EntityRecord;

/// A class (course group) managed by a teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolClass {
    /// Unique class identifier.
    pub id: EntityId,
    /// The teacher who owns the class.
    pub owner_id: UserId,
    /// Display name, e.g. `"7B"`.
    pub name: String,
    /// Subject taught, if the class is subject-specific.
    pub subject: Option<String>,
}

impl SchoolClass {
    /// The collection classes are stored under.
    pub const KIND: EntityKind = EntityKind::Classes;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip() {
        let class = SchoolClass {
            id: EntityId::new(),
            owner_id: UserId::new(),
            name: "7B".to_string(),
            subject: Some("Mathematics".to_string()),
        };
        let record = class.clone().into_record(Utc::now()).unwrap();
        let parsed = SchoolClass::from_record(&record).unwrap();
        assert_eq!(parsed.name, "7B");
        assert_eq!(parsed.subject.as_deref(), Some("Mathematics"));
    }
}
