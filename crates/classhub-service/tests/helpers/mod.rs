//! Shared fixtures for the service integration tests.

// Each test binary uses its own subset of the harness.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use classhub_cache::MemoryEntityCache;
use classhub_core::config::cache::CacheConfig;
use classhub_core::config::undo::UndoConfig;
use classhub_core::error::AppError;
use classhub_core::result::AppResult;
use classhub_core::traits::cache::EntityCache;
use classhub_core::traits::clock::{Clock, ManualClock};
use classhub_core::types::id::{EntityId, UserId};
use classhub_core::types::kind::EntityKind;
use classhub_core::types::visibility::Visibility;
use classhub_entity::EntityRecord;
use classhub_entity::student::model::Student;
use classhub_service::{
    OptimisticMutationCoordinator, RequestContext, SoftDeleteService, UndoManager,
};
use classhub_store::{EntityStore, MemoryEntityStore};

/// Entity store wrapper that fails selected operations on demand.
///
/// Failures are armed as counters: after `fail_next_restores(1)` the
/// next restore-marker write returns a persistence error, then the
/// store behaves normally again.
#[derive(Debug)]
pub struct FlakyStore {
    inner: MemoryEntityStore,
    failing_deletes: AtomicUsize,
    failing_restores: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryEntityStore::new(),
            failing_deletes: AtomicUsize::new(0),
            failing_restores: AtomicUsize::new(0),
        }
    }

    /// Arm the next `count` delete-marker writes to fail.
    pub fn fail_next_deletes(&self, count: usize) {
        self.failing_deletes.store(count, Ordering::SeqCst);
    }

    /// Arm the next `count` restore-marker writes to fail.
    pub fn fail_next_restores(&self, count: usize) {
        self.failing_restores.store(count, Ordering::SeqCst);
    }

    fn should_fail(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl EntityStore for FlakyStore {
    async fn insert(&self, record: EntityRecord) -> AppResult<()> {
        self.inner.insert(record).await
    }

    async fn fetch(&self, kind: EntityKind, id: EntityId) -> AppResult<Option<EntityRecord>> {
        self.inner.fetch(kind, id).await
    }

    async fn list(
        &self,
        kind: EntityKind,
        owner_id: UserId,
        visibility: Visibility,
    ) -> AppResult<Vec<EntityRecord>> {
        self.inner.list(kind, owner_id, visibility).await
    }

    async fn count(
        &self,
        kind: EntityKind,
        owner_id: UserId,
        visibility: Visibility,
    ) -> AppResult<usize> {
        self.inner.count(kind, owner_id, visibility).await
    }

    async fn write_payload(
        &self,
        kind: EntityKind,
        id: EntityId,
        payload: serde_json::Value,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.inner.write_payload(kind, id, payload, at).await
    }

    async fn mark_deleted(
        &self,
        kind: EntityKind,
        id: EntityId,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        if Self::should_fail(&self.failing_deletes) {
            return Err(AppError::persistence("injected delete failure"));
        }
        self.inner.mark_deleted(kind, id, at).await
    }

    async fn mark_deleted_bulk(
        &self,
        kind: EntityKind,
        ids: &[EntityId],
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        if Self::should_fail(&self.failing_deletes) {
            return Err(AppError::persistence("injected delete failure"));
        }
        self.inner.mark_deleted_bulk(kind, ids, at).await
    }

    async fn clear_deleted(
        &self,
        kind: EntityKind,
        id: EntityId,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        if Self::should_fail(&self.failing_restores) {
            return Err(AppError::persistence("injected restore failure"));
        }
        self.inner.clear_deleted(kind, id, at).await
    }

    async fn clear_deleted_bulk(
        &self,
        kind: EntityKind,
        ids: &[EntityId],
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        if Self::should_fail(&self.failing_restores) {
            return Err(AppError::persistence("injected restore failure"));
        }
        self.inner.clear_deleted_bulk(kind, ids, at).await
    }
}

/// Fully wired service stack over in-memory backends.
pub struct TestHarness {
    /// Row storage with failure injection.
    pub store: Arc<FlakyStore>,
    /// The read cache the coordinator patches.
    pub cache: Arc<MemoryEntityCache>,
    /// Manually advanced time source.
    pub clock: Arc<ManualClock>,
    /// Soft delete service under test.
    pub soft_delete: Arc<SoftDeleteService>,
    /// Undo manager under test.
    pub undo: Arc<UndoManager>,
    /// Optimistic mutation coordinator under test.
    pub coordinator: Arc<OptimisticMutationCoordinator>,
    /// Context for the harness's own user.
    pub ctx: RequestContext,
}

impl TestHarness {
    /// Create a harness with default configuration.
    pub fn new() -> Self {
        Self::with_undo_config(UndoConfig::default())
    }

    /// Create a harness with a specific undo configuration.
    pub fn with_undo_config(config: UndoConfig) -> Self {
        let store = Arc::new(FlakyStore::new());
        let cache = Arc::new(MemoryEntityCache::new(&CacheConfig::default()));
        let clock = Arc::new(ManualClock::starting_now());
        let soft_delete = Arc::new(SoftDeleteService::new(
            Arc::clone(&store) as Arc<dyn EntityStore>,
            Arc::clone(&clock) as Arc<dyn Clock>,
        ));
        let undo = Arc::new(UndoManager::new(
            Arc::clone(&soft_delete),
            Arc::clone(&store) as Arc<dyn EntityStore>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            config,
        ));
        let coordinator = Arc::new(OptimisticMutationCoordinator::new(
            Arc::clone(&cache) as Arc<dyn EntityCache>
        ));
        let ctx = RequestContext::at(UserId::new(), clock.now());
        Self {
            store,
            cache,
            clock,
            soft_delete,
            undo,
            coordinator,
            ctx,
        }
    }

    /// Insert a student row owned by the harness user.
    pub async fn seed_student(&self, first_name: &str, last_name: &str) -> EntityId {
        self.seed_student_for(self.ctx.user_id, first_name, last_name)
            .await
    }

    /// Insert a student row owned by an arbitrary user.
    pub async fn seed_student_for(
        &self,
        owner: UserId,
        first_name: &str,
        last_name: &str,
    ) -> EntityId {
        let student = Student {
            id: EntityId::new(),
            owner_id: owner,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            class_id: None,
            email: None,
        };
        let record = student
            .into_record(self.clock.now())
            .expect("student serializes");
        let id = record.id;
        self.store.insert(record).await.expect("insert seed row");
        id
    }

    /// Fetch one row that is expected to exist.
    pub async fn row(&self, kind: EntityKind, id: EntityId) -> EntityRecord {
        self.store
            .fetch(kind, id)
            .await
            .expect("fetch seed row")
            .expect("row exists")
    }

    /// Count the harness user's active rows of a kind.
    pub async fn active_count(&self, kind: EntityKind) -> usize {
        self.store
            .count(kind, self.ctx.user_id, Visibility::Active)
            .await
            .expect("count rows")
    }

    /// Count the harness user's deleted rows of a kind.
    pub async fn deleted_count(&self, kind: EntityKind) -> usize {
        self.store
            .count(kind, self.ctx.user_id, Visibility::Deleted)
            .await
            .expect("count rows")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
