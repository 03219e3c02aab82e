//! In-memory entity store using dashmap.

use chrono::{DateTime, Utc};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use classhub_core::error::AppError;
use classhub_core::result::AppResult;
use classhub_core::types::id::{EntityId, UserId};
use classhub_core::types::kind::EntityKind;
use classhub_core::types::visibility::Visibility;

use classhub_entity::EntityRecord;

use crate::traits::EntityStore;

/// In-process entity store backed by a concurrent map.
///
/// Stands in for the managed backend in development and tests, the same
/// way an in-memory cache stands in for a cache server. Rows live in a
/// single map keyed by `(kind, id)`.
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    /// `(kind, id)` → row.
    rows: DashMap<(EntityKind, EntityId), EntityRecord>,
}

impl MemoryEntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of rows across all kinds, deleted included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Validate that every id exists before a bulk write touches any
    /// row. Keeps the bulk variants all-or-nothing.
    fn require_all(&self, kind: EntityKind, ids: &[EntityId]) -> AppResult<()> {
        for id in ids {
            if !self.rows.contains_key(&(kind, *id)) {
                return Err(AppError::not_found(format!("Row {id} not found in {kind}")));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn insert(&self, record: EntityRecord) -> AppResult<()> {
        let key = (record.kind, record.id);
        if self.rows.contains_key(&key) {
            return Err(AppError::conflict(format!(
                "Row {} already exists in {}",
                record.id, record.kind
            )));
        }
        self.rows.insert(key, record);
        Ok(())
    }

    async fn fetch(&self, kind: EntityKind, id: EntityId) -> AppResult<Option<EntityRecord>> {
        Ok(self.rows.get(&(kind, id)).map(|row| row.value().clone()))
    }

    async fn list(
        &self,
        kind: EntityKind,
        owner_id: UserId,
        visibility: Visibility,
    ) -> AppResult<Vec<EntityRecord>> {
        let mut rows: Vec<EntityRecord> = self
            .rows
            .iter()
            .filter(|entry| {
                let row = entry.value();
                row.kind == kind && row.owner_id == owner_id && visibility.admits(row.is_deleted())
            })
            .map(|entry| entry.value().clone())
            .collect();

        // Map iteration order is arbitrary; present rows in creation order.
        rows.sort_by_key(|row| (row.created_at, row.id.into_uuid()));
        Ok(rows)
    }

    async fn count(
        &self,
        kind: EntityKind,
        owner_id: UserId,
        visibility: Visibility,
    ) -> AppResult<usize> {
        let count = self
            .rows
            .iter()
            .filter(|entry| {
                let row = entry.value();
                row.kind == kind && row.owner_id == owner_id && visibility.admits(row.is_deleted())
            })
            .count();
        Ok(count)
    }

    async fn write_payload(
        &self,
        kind: EntityKind,
        id: EntityId,
        payload: serde_json::Value,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut row = self
            .rows
            .get_mut(&(kind, id))
            .ok_or_else(|| AppError::not_found(format!("Row {id} not found in {kind}")))?;
        row.set_payload(payload, at);
        Ok(())
    }

    async fn mark_deleted(
        &self,
        kind: EntityKind,
        id: EntityId,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut row = self
            .rows
            .get_mut(&(kind, id))
            .ok_or_else(|| AppError::not_found(format!("Row {id} not found in {kind}")))?;
        row.mark_deleted(at);
        Ok(())
    }

    async fn mark_deleted_bulk(
        &self,
        kind: EntityKind,
        ids: &[EntityId],
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.require_all(kind, ids)?;
        for id in ids {
            if let Some(mut row) = self.rows.get_mut(&(kind, *id)) {
                row.mark_deleted(at);
            }
        }
        debug!(kind = %kind, count = ids.len(), "Bulk soft-delete applied");
        Ok(())
    }

    async fn clear_deleted(
        &self,
        kind: EntityKind,
        id: EntityId,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut row = self
            .rows
            .get_mut(&(kind, id))
            .ok_or_else(|| AppError::not_found(format!("Row {id} not found in {kind}")))?;
        row.clear_deleted(at);
        Ok(())
    }

    async fn clear_deleted_bulk(
        &self,
        kind: EntityKind,
        ids: &[EntityId],
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.require_all(kind, ids)?;
        for id in ids {
            if let Some(mut row) = self.rows.get_mut(&(kind, *id)) {
                row.clear_deleted(at);
            }
        }
        debug!(kind = %kind, count = ids.len(), "Bulk restore applied");
        Ok(())
    }
}
