//! Task entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use classhub_core::types::id::{EntityId, UserId};
use classhub_core::types::kind::EntityKind;
use classhub_core::{AppError, AppResult};

use crate::record::EntityRecord;

/// A teacher's to-do item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: EntityId,
    /// The teacher who owns the task.
    pub owner_id: UserId,
    /// Short task description.
    pub title: String,
    /// The class the task relates to, if any.
    pub class_id: Option<EntityId>,
    /// Optional deadline.
    pub due_date: Option<NaiveDate>,
    /// Whether the task has been checked off.
    pub completed: bool,
}

impl Task {
    /// The collection tasks are stored under.
    pub const KIND: EntityKind = EntityKind::Tasks;

    /// Whether the task has a deadline strictly before the given day and
    /// is still open.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn task(due: Option<NaiveDate>, completed: bool) -> Task {
        Task {
            id: EntityId::new(),
            owner_id: UserId::new(),
            title: "Grade algebra quizzes".to_string(),
            class_id: None,
            due_date: due,
            completed,
        }
    }

    #[test]
    fn test_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 9, 9).unwrap();

        assert!(task(Some(yesterday), false).is_overdue(today));
        assert!(!task(Some(yesterday), true).is_overdue(today));
        assert!(!task(Some(today), false).is_overdue(today));
        assert!(!task(None, false).is_overdue(today));
    }

    #[test]
    fn test_record_roundtrip() {
        let original = task(None, false);
        let record = original.clone().into_record(Utc::now()).unwrap();
        assert_eq!(record.kind, EntityKind::Tasks);

        let parsed = Task::from_record(&record).unwrap();
        assert_eq!(parsed.title, original.title);
        assert!(!parsed.completed);
    }
}
