//! Soft delete and restore operations over the entity store.

use std::sync::Arc;

use tracing::info;

use classhub_core::error::AppError;
use classhub_core::result::AppResult;
use classhub_core::traits::clock::Clock;
use classhub_core::types::id::EntityId;
use classhub_core::types::kind::EntityKind;
use classhub_core::types::visibility::Visibility;

use classhub_entity::EntityRecord;
use classhub_store::EntityStore;

use crate::context::RequestContext;

/// Owner-scoped soft delete, restore, and reads over the store port.
///
/// Deleting sets the row's `deleted_at` marker and nothing else; no
/// cascades run here. Both delete and restore are idempotent: repeating
/// either leaves the row in the same final state and reports success.
/// Per-item failure bookkeeping for batches is the bulk executor's job;
/// the bulk methods here are one logical all-or-nothing write.
#[derive(Debug, Clone)]
pub struct SoftDeleteService {
    /// Entity row storage.
    store: Arc<dyn EntityStore>,
    /// Time source for deletion timestamps.
    clock: Arc<dyn Clock>,
}

impl SoftDeleteService {
    /// Creates a new soft delete service.
    pub fn new(store: Arc<dyn EntityStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Set the soft-delete marker on one row.
    ///
    /// Deleting an already-deleted row is a no-op success; the original
    /// deletion timestamp is kept.
    pub async fn soft_delete(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        id: EntityId,
    ) -> AppResult<()> {
        let row = self.fetch_owned(ctx, kind, id).await?;
        if row.is_deleted() {
            return Ok(());
        }

        self.store.mark_deleted(kind, id, self.clock.now()).await?;

        info!(user_id = %ctx.user_id, kind = %kind, id = %id, "Row soft-deleted");

        Ok(())
    }

    /// Set the soft-delete marker on several rows as one logical write.
    ///
    /// Every row's existence and ownership is verified before anything
    /// is written; partial application is left to transactional
    /// backends, never done here.
    pub async fn soft_delete_bulk(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        ids: &[EntityId],
    ) -> AppResult<()> {
        if ids.is_empty() {
            return Err(AppError::validation("No ids given for bulk soft delete"));
        }
        for id in ids {
            self.fetch_owned(ctx, kind, *id).await?;
        }

        self.store
            .mark_deleted_bulk(kind, ids, self.clock.now())
            .await?;

        info!(user_id = %ctx.user_id, kind = %kind, count = ids.len(), "Rows soft-deleted");

        Ok(())
    }

    /// Clear the soft-delete marker on one row.
    ///
    /// Restoring an active row is a no-op success.
    pub async fn restore(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        id: EntityId,
    ) -> AppResult<()> {
        let row = self.fetch_owned(ctx, kind, id).await?;
        if row.is_active() {
            return Ok(());
        }

        self.store.clear_deleted(kind, id, self.clock.now()).await?;

        info!(user_id = %ctx.user_id, kind = %kind, id = %id, "Row restored");

        Ok(())
    }

    /// Clear the soft-delete marker on several rows as one logical
    /// write, with the same up-front verification as
    /// [`SoftDeleteService::soft_delete_bulk`].
    pub async fn restore_bulk(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        ids: &[EntityId],
    ) -> AppResult<()> {
        if ids.is_empty() {
            return Err(AppError::validation("No ids given for bulk restore"));
        }
        for id in ids {
            self.fetch_owned(ctx, kind, *id).await?;
        }

        self.store
            .clear_deleted_bulk(kind, ids, self.clock.now())
            .await?;

        info!(user_id = %ctx.user_id, kind = %kind, count = ids.len(), "Rows restored");

        Ok(())
    }

    /// Fetch one active row owned by the caller.
    ///
    /// Soft-deleted rows are reported as `NotFound`; the default read
    /// path never sees them.
    pub async fn find(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        id: EntityId,
    ) -> AppResult<EntityRecord> {
        let row = self.fetch_owned(ctx, kind, id).await?;
        if row.is_deleted() {
            return Err(AppError::not_found(format!("Row {id} not found in {kind}")));
        }
        Ok(row)
    }

    /// List the caller's rows of one kind under an explicit visibility.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        visibility: Visibility,
    ) -> AppResult<Vec<EntityRecord>> {
        self.store.list(kind, ctx.user_id, visibility).await
    }

    /// Count the caller's rows of one kind under an explicit visibility.
    pub async fn count(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        visibility: Visibility,
    ) -> AppResult<usize> {
        self.store.count(kind, ctx.user_id, visibility).await
    }

    /// Internal fetch without a visibility filter, with ownership check.
    async fn fetch_owned(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        id: EntityId,
    ) -> AppResult<EntityRecord> {
        let row = self
            .store
            .fetch(kind, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Row {id} not found in {kind}")))?;

        if row.owner_id != ctx.user_id {
            return Err(AppError::permission(format!(
                "Row {id} is not owned by the caller"
            )));
        }

        Ok(row)
    }
}
