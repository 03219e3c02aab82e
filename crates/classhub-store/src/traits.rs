//! Storage port for pluggable entity row backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use classhub_core::result::AppResult;
use classhub_core::types::id::{EntityId, UserId};
use classhub_core::types::kind::EntityKind;
use classhub_core::types::visibility::Visibility;

use classhub_entity::EntityRecord;

/// Trait for entity row storage backends.
///
/// Rows are addressed by `(kind, id)`. Soft delete is the only kind of
/// delete the port offers: `mark_deleted` sets the marker and
/// `clear_deleted` removes it, so a delete followed by a restore is the
/// identity on the payload. The bulk variants apply one logical write to
/// all ids or fail without touching any row.
///
/// Implementations must make repeated `mark_deleted`/`clear_deleted`
/// calls idempotent with respect to the final row state.
#[async_trait]
pub trait EntityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new row. Fails with `Conflict` if a row with the same
    /// `(kind, id)` already exists.
    async fn insert(&self, record: EntityRecord) -> AppResult<()>;

    /// Fetch a row by id, regardless of its deletion marker. Returns
    /// `None` if the row does not exist.
    async fn fetch(&self, kind: EntityKind, id: EntityId) -> AppResult<Option<EntityRecord>>;

    /// List an owner's rows of one kind, filtered by visibility, in
    /// creation order.
    async fn list(
        &self,
        kind: EntityKind,
        owner_id: UserId,
        visibility: Visibility,
    ) -> AppResult<Vec<EntityRecord>>;

    /// Count an owner's rows of one kind, filtered by visibility.
    async fn count(
        &self,
        kind: EntityKind,
        owner_id: UserId,
        visibility: Visibility,
    ) -> AppResult<usize>;

    /// Replace a row's payload document. Fails with `NotFound` if the
    /// row does not exist.
    async fn write_payload(
        &self,
        kind: EntityKind,
        id: EntityId,
        payload: serde_json::Value,
        at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Set the soft-delete marker on a row. A no-op on already-deleted
    /// rows. Fails with `NotFound` if the row does not exist.
    async fn mark_deleted(&self, kind: EntityKind, id: EntityId, at: DateTime<Utc>)
    -> AppResult<()>;

    /// Set the soft-delete marker on several rows as one logical write.
    /// Every id is validated before any row is touched; a missing id
    /// fails the whole call with `NotFound`.
    async fn mark_deleted_bulk(
        &self,
        kind: EntityKind,
        ids: &[EntityId],
        at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Clear the soft-delete marker on a row. A no-op on active rows.
    /// Fails with `NotFound` if the row does not exist.
    async fn clear_deleted(
        &self,
        kind: EntityKind,
        id: EntityId,
        at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Clear the soft-delete marker on several rows as one logical
    /// write, with the same all-or-nothing validation as
    /// [`EntityStore::mark_deleted_bulk`].
    async fn clear_deleted_bulk(
        &self,
        kind: EntityKind,
        ids: &[EntityId],
        at: DateTime<Utc>,
    ) -> AppResult<()>;
}
