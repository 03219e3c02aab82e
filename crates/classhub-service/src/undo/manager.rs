//! Durable log of reversible actions with a bounded undo window.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, info};

use classhub_core::config::undo::UndoConfig;
use classhub_core::error::AppError;
use classhub_core::events::ActionEvent;
use classhub_core::result::AppResult;
use classhub_core::traits::clock::Clock;
use classhub_core::types::bulk::BulkReport;
use classhub_core::types::id::{ActionId, EntityId};
use classhub_core::types::kind::EntityKind;

use classhub_entity::action::{ActionRecord, ActionStatus, ActionType, EntitySnapshot};
use classhub_store::EntityStore;

use crate::bulk::{execute_bulk, BulkOptions};
use crate::context::RequestContext;
use crate::soft_delete::SoftDeleteService;

/// Outcome of a delete that was recorded for undo.
#[derive(Debug)]
pub struct UndoableDelete {
    /// Per-item outcome of the delete itself.
    pub report: BulkReport,
    /// The recorded action covering the rows that were deleted, absent
    /// when no row was.
    pub action: Option<ActionRecord>,
}

/// In-memory log of reversible actions.
///
/// Each recorded action stays undoable until its window closes. Expiry
/// is lazy: nothing fires at the deadline, the status flips the next
/// time the record is touched past it. Undo applies the inverse
/// operation first and transitions the record second, so a failed
/// inverse leaves the record pending and retryable; the transition
/// itself is a compare-and-set, so of two racing undos exactly one
/// succeeds.
pub struct UndoManager {
    /// All tracked action records, pending and terminal.
    actions: DashMap<ActionId, ActionRecord>,
    /// Inverse dispatch target for delete and restore actions.
    soft_delete: Arc<SoftDeleteService>,
    /// Direct payload writes for update reversal.
    store: Arc<dyn EntityStore>,
    /// Time source for windows and expiry checks.
    clock: Arc<dyn Clock>,
    /// Window length and retention bounds.
    config: UndoConfig,
    /// Lifecycle event fan-out for the notification surface.
    events: broadcast::Sender<ActionEvent>,
}

impl UndoManager {
    /// Creates a new undo manager.
    pub fn new(
        soft_delete: Arc<SoftDeleteService>,
        store: Arc<dyn EntityStore>,
        clock: Arc<dyn Clock>,
        config: UndoConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            actions: DashMap::new(),
            soft_delete,
            store,
            clock,
            config,
            events,
        }
    }

    /// Record a reversible action and open its undo window.
    ///
    /// The caller has already performed the forward operation;
    /// `affected_ids` lists the rows it touched and must not be empty.
    /// Action types that reverse by rewriting payloads must supply a
    /// snapshot entry for every affected row.
    pub fn record_action(
        &self,
        ctx: &RequestContext,
        action_type: ActionType,
        entity_kind: EntityKind,
        affected_ids: Vec<EntityId>,
        snapshot: Option<Vec<EntitySnapshot>>,
        description: impl Into<String>,
    ) -> AppResult<ActionRecord> {
        if affected_ids.is_empty() {
            return Err(AppError::validation(
                "An action must affect at least one row",
            ));
        }
        if action_type.requires_snapshot() {
            let covered: HashSet<EntityId> = snapshot
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|entry| entry.id)
                .collect();
            if let Some(missing) = affected_ids.iter().find(|id| !covered.contains(id)) {
                return Err(AppError::validation(format!(
                    "Action type '{action_type}' needs a snapshot for every affected row, missing {missing}"
                )));
            }
        }

        self.prune();

        let record = ActionRecord::new(
            ctx.user_id,
            action_type,
            entity_kind,
            affected_ids,
            snapshot,
            description,
            self.clock.now(),
            self.config.window(),
        );

        info!(
            user_id = %ctx.user_id,
            action_id = %record.id,
            action_type = %record.action_type,
            entity_kind = %record.entity_kind,
            affected = record.affected_ids.len(),
            "Reversible action recorded"
        );

        self.actions.insert(record.id, record.clone());
        let _ = self.events.send(ActionEvent::Recorded {
            action_id: record.id,
            user_id: record.user_id,
            entity_kind: record.entity_kind,
            affected: record.affected_ids.len(),
            description: record.description.clone(),
            expires_at: record.expires_at,
        });

        Ok(record)
    }

    /// Undo a recorded action within its window.
    ///
    /// Fails with `NotFound` for unknown ids, `Permission` when the
    /// caller did not record the action, `AlreadyUndone` after a
    /// successful undo, and `Expired` once the window has closed. A
    /// persistence failure while applying the inverse leaves the record
    /// pending, so the caller may retry until expiry.
    pub async fn undo(&self, ctx: &RequestContext, action_id: ActionId) -> AppResult<ActionRecord> {
        let record = self
            .actions
            .get(&action_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Action {action_id} not found")))?;

        if record.user_id != ctx.user_id {
            return Err(AppError::permission(format!(
                "Action {action_id} belongs to another user"
            )));
        }

        match record.status {
            ActionStatus::Undone => {
                return Err(AppError::already_undone(format!(
                    "Action {action_id} was already undone"
                )));
            }
            ActionStatus::Expired => {
                return Err(AppError::expired(format!(
                    "The undo window for action {action_id} has closed"
                )));
            }
            ActionStatus::Pending => {}
        }

        if record.is_expired(self.clock.now()) {
            self.expire(&record);
            return Err(AppError::expired(format!(
                "The undo window for action {action_id} has closed"
            )));
        }

        // Inverse first, transition second: a failed inverse must leave
        // the record pending and retryable.
        self.apply_inverse(ctx, &record).await?;

        if !self.transition(action_id, ActionStatus::Undone) {
            // A concurrent undo won the transition. Its inverse has
            // already run; ours was an idempotent repeat of it.
            return Err(AppError::already_undone(format!(
                "Action {action_id} was already undone"
            )));
        }

        info!(
            user_id = %ctx.user_id,
            action_id = %action_id,
            action_type = %record.action_type,
            "Action undone"
        );
        let _ = self.events.send(ActionEvent::Undone {
            action_id,
            user_id: record.user_id,
        });

        let mut undone = record;
        undone.status = ActionStatus::Undone;
        Ok(undone)
    }

    /// Soft-delete rows and record the deletion for undo in one step.
    ///
    /// The delete runs through the bulk executor, so per-item failures
    /// are reported rather than raised. The recorded action covers
    /// exactly the rows that were deleted; when none were, no action is
    /// recorded and `action` is `None`.
    pub async fn soft_delete_with_undo(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        ids: &[EntityId],
        description: impl Into<String>,
    ) -> AppResult<UndoableDelete> {
        if ids.is_empty() {
            return Err(AppError::validation("No ids given for delete"));
        }

        if let [id] = ids {
            self.soft_delete.soft_delete(ctx, kind, *id).await?;
            let mut report = BulkReport::new();
            report.record_success();
            let action =
                self.record_action(ctx, ActionType::Delete, kind, vec![*id], None, description)?;
            return Ok(UndoableDelete {
                report,
                action: Some(action),
            });
        }

        let report = execute_bulk(
            ids,
            |id| self.soft_delete.soft_delete(ctx, kind, id),
            BulkOptions::default(),
        )
        .await;

        let failed: HashSet<EntityId> = report.errors.iter().map(|failure| failure.id).collect();
        let deleted: Vec<EntityId> = ids
            .iter()
            .copied()
            .filter(|id| !failed.contains(id))
            .collect();

        let action = if deleted.is_empty() {
            None
        } else {
            Some(self.record_action(
                ctx,
                ActionType::BulkDelete,
                kind,
                deleted,
                None,
                description,
            )?)
        };

        Ok(UndoableDelete { report, action })
    }

    /// Look up one action record by id.
    pub fn get(&self, action_id: ActionId) -> Option<ActionRecord> {
        self.actions
            .get(&action_id)
            .map(|entry| entry.value().clone())
    }

    /// The caller's still-undoable actions, oldest first.
    ///
    /// Records whose window has closed are expired on the way out and
    /// excluded from the result.
    pub fn pending_for(&self, ctx: &RequestContext) -> Vec<ActionRecord> {
        let now = self.clock.now();
        let mut pending = Vec::new();
        let mut overdue = Vec::new();
        for entry in self.actions.iter() {
            let record = entry.value();
            if record.user_id != ctx.user_id || !record.is_pending() {
                continue;
            }
            if record.is_expired(now) {
                overdue.push(record.clone());
            } else {
                pending.push(record.clone());
            }
        }
        // Status writes happen after the iteration; DashMap shards must
        // not be written while an iterator holds their read locks.
        for record in &overdue {
            self.expire(record);
        }
        pending.sort_by_key(|record| record.created_at);
        pending
    }

    /// Subscribe to action lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<ActionEvent> {
        self.events.subscribe()
    }

    /// Number of tracked records, pending and terminal.
    pub fn tracked(&self) -> usize {
        self.actions.len()
    }

    /// Apply the inverse of a recorded action.
    async fn apply_inverse(&self, ctx: &RequestContext, record: &ActionRecord) -> AppResult<()> {
        match record.action_type {
            ActionType::Delete | ActionType::BulkDelete => {
                match record.affected_ids.as_slice() {
                    [id] => self.soft_delete.restore(ctx, record.entity_kind, *id).await,
                    ids => {
                        self.soft_delete
                            .restore_bulk(ctx, record.entity_kind, ids)
                            .await
                    }
                }
            }
            ActionType::Restore => match record.affected_ids.as_slice() {
                [id] => {
                    self.soft_delete
                        .soft_delete(ctx, record.entity_kind, *id)
                        .await
                }
                ids => {
                    self.soft_delete
                        .soft_delete_bulk(ctx, record.entity_kind, ids)
                        .await
                }
            },
            ActionType::Update => {
                let snapshots = record
                    .snapshot
                    .as_deref()
                    .ok_or_else(|| AppError::internal("Update action has no snapshot"))?;
                let now = self.clock.now();
                for snapshot in snapshots {
                    self.store
                        .write_payload(
                            record.entity_kind,
                            snapshot.id,
                            snapshot.payload.clone(),
                            now,
                        )
                        .await?;
                }
                Ok(())
            }
        }
    }

    /// Move a pending record into a terminal status.
    ///
    /// Returns `false` when the record is gone or already terminal, so
    /// racing callers can tell whether their transition took.
    fn transition(&self, action_id: ActionId, next: ActionStatus) -> bool {
        let Some(mut entry) = self.actions.get_mut(&action_id) else {
            return false;
        };
        if !entry.status.can_transition_to(next) {
            return false;
        }
        entry.status = next;
        true
    }

    /// Expire one overdue pending record and announce it.
    fn expire(&self, record: &ActionRecord) {
        if self.transition(record.id, ActionStatus::Expired) {
            debug!(action_id = %record.id, "Undo window closed");
            let _ = self.events.send(ActionEvent::Expired {
                action_id: record.id,
                user_id: record.user_id,
            });
        }
    }

    /// Expire overdue records, then drop the oldest terminal ones past
    /// the retention bound. Pending records are never dropped.
    fn prune(&self) {
        let now = self.clock.now();
        let overdue: Vec<ActionRecord> = self
            .actions
            .iter()
            .filter(|entry| entry.value().is_pending() && entry.value().is_expired(now))
            .map(|entry| entry.value().clone())
            .collect();
        for record in &overdue {
            self.expire(record);
        }

        let excess = self
            .actions
            .len()
            .saturating_sub(self.config.max_tracked_actions);
        if excess == 0 {
            return;
        }
        let mut terminal: Vec<(DateTime<Utc>, ActionId)> = self
            .actions
            .iter()
            .filter(|entry| entry.value().status.is_terminal())
            .map(|entry| (entry.value().created_at, entry.value().id))
            .collect();
        terminal.sort_by_key(|(created_at, _)| *created_at);
        let dropped = terminal.len().min(excess);
        for (_, id) in terminal.into_iter().take(excess) {
            self.actions.remove(&id);
        }
        if dropped > 0 {
            debug!(dropped, "Pruned terminal action records");
        }
    }
}

impl std::fmt::Debug for UndoManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoManager")
            .field("tracked", &self.actions.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
