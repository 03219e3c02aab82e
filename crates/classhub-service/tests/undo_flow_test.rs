//! End-to-end undo flows across the service stack.

mod helpers;

use std::sync::Arc;

use chrono::Duration;
use futures::future::join_all;

use classhub_core::error::ErrorKind;
use classhub_core::events::ActionEvent;
use classhub_core::traits::Clock;
use classhub_core::types::kind::EntityKind;
use classhub_entity::action::{ActionStatus, ActionType};

use helpers::TestHarness;

#[tokio::test]
async fn test_delete_toast_undo_round_trip() {
    // A teacher deletes three students and clicks undo on the toast
    // inside the window.
    let h = TestHarness::new();
    let ids = vec![
        h.seed_student("Mina", "Larsen").await,
        h.seed_student("Joon", "Park").await,
        h.seed_student("Ada", "Okafor").await,
    ];
    let mut events = h.undo.subscribe();

    let outcome = h
        .undo
        .soft_delete_with_undo(&h.ctx, EntityKind::Students, &ids, "Deleted 3 students")
        .await
        .unwrap();
    assert!(outcome.report.is_complete_success());
    assert_eq!(h.active_count(EntityKind::Students).await, 0);
    assert_eq!(h.deleted_count(EntityKind::Students).await, 3);

    let action = outcome.action.unwrap();
    assert_eq!(action.action_type, ActionType::BulkDelete);
    let ActionEvent::Recorded {
        affected,
        expires_at,
        ..
    } = events.try_recv().unwrap()
    else {
        panic!("expected a recorded event");
    };
    assert_eq!(affected, 3);
    assert_eq!(expires_at, action.expires_at);

    h.clock.advance(Duration::seconds(9));
    let undone = h.undo.undo(&h.ctx, action.id).await.unwrap();
    assert_eq!(undone.status, ActionStatus::Undone);
    assert_eq!(h.active_count(EntityKind::Students).await, 3);
    assert_eq!(h.deleted_count(EntityKind::Students).await, 0);
    assert!(matches!(
        events.try_recv().unwrap(),
        ActionEvent::Undone { .. }
    ));
}

#[tokio::test]
async fn test_undo_can_be_retried_after_persistence_failure() {
    let h = TestHarness::new();
    let id = h.seed_student("Mina", "Larsen").await;
    let outcome = h
        .undo
        .soft_delete_with_undo(&h.ctx, EntityKind::Students, &[id], "Deleted 1 student")
        .await
        .unwrap();
    let action = outcome.action.unwrap();

    h.store.fail_next_restores(1);
    let err = h.undo.undo(&h.ctx, action.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Persistence);
    assert!(err.is_retryable());

    // The failed inverse left the record pending, so the same undo
    // still works once storage recovers.
    assert_eq!(
        h.undo.get(action.id).unwrap().status,
        ActionStatus::Pending
    );
    h.undo.undo(&h.ctx, action.id).await.unwrap();
    assert!(h.row(EntityKind::Students, id).await.is_active());
}

#[tokio::test]
async fn test_concurrent_undo_has_a_single_winner() {
    let h = TestHarness::new();
    let id = h.seed_student("Mina", "Larsen").await;
    let outcome = h
        .undo
        .soft_delete_with_undo(&h.ctx, EntityKind::Students, &[id], "Deleted 1 student")
        .await
        .unwrap();
    let action_id = outcome.action.unwrap().id;

    let attempts = (0..4).map(|_| {
        let undo = Arc::clone(&h.undo);
        let ctx = h.ctx.clone();
        tokio::spawn(async move { undo.undo(&ctx, action_id).await })
    });
    let results = join_all(attempts).await;

    let successes = results
        .iter()
        .filter(|result| result.as_ref().unwrap().is_ok())
        .count();
    assert_eq!(successes, 1);
    for result in results {
        if let Err(err) = result.unwrap() {
            assert_eq!(err.kind, ErrorKind::AlreadyUndone);
        }
    }
    assert!(h.row(EntityKind::Students, id).await.is_active());
    assert_eq!(
        h.undo.get(action_id).unwrap().status,
        ActionStatus::Undone
    );
}

#[tokio::test]
async fn test_window_boundary_is_exclusive() {
    let h = TestHarness::new();
    let id = h.seed_student("Mina", "Larsen").await;
    let outcome = h
        .undo
        .soft_delete_with_undo(&h.ctx, EntityKind::Students, &[id], "Deleted 1 student")
        .await
        .unwrap();
    let action = outcome.action.unwrap();

    // Exactly at expires_at the window has closed.
    h.clock.advance(Duration::seconds(10));
    let err = h.undo.undo(&h.ctx, action.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Expired);

    // The delete stands and the toast list is empty.
    assert_eq!(h.deleted_count(EntityKind::Students).await, 1);
    assert!(h.undo.pending_for(&h.ctx).is_empty());
}

#[tokio::test]
async fn test_undo_of_restore_deletes_again() {
    let h = TestHarness::new();
    let first = h.seed_student("Mina", "Larsen").await;
    let second = h.seed_student("Joon", "Park").await;
    let ids = [first, second];
    h.soft_delete
        .soft_delete_bulk(&h.ctx, EntityKind::Students, &ids)
        .await
        .unwrap();

    h.soft_delete
        .restore_bulk(&h.ctx, EntityKind::Students, &ids)
        .await
        .unwrap();
    let action = h
        .undo
        .record_action(
            &h.ctx,
            ActionType::Restore,
            EntityKind::Students,
            ids.to_vec(),
            None,
            "Restored 2 students",
        )
        .unwrap();

    h.undo.undo(&h.ctx, action.id).await.unwrap();
    assert!(h.row(EntityKind::Students, first).await.is_deleted());
    assert!(h.row(EntityKind::Students, second).await.is_deleted());
}

#[tokio::test]
async fn test_toast_list_tracks_windows_per_action() {
    let h = TestHarness::new();
    let first = h.seed_student("Mina", "Larsen").await;
    let second = h.seed_student("Joon", "Park").await;

    let older = h
        .undo
        .soft_delete_with_undo(&h.ctx, EntityKind::Students, &[first], "Deleted 1 student")
        .await
        .unwrap()
        .action
        .unwrap();
    h.clock.advance(Duration::seconds(6));
    let newer = h
        .undo
        .soft_delete_with_undo(&h.ctx, EntityKind::Students, &[second], "Deleted 1 student")
        .await
        .unwrap()
        .action
        .unwrap();

    let pending = h.undo.pending_for(&h.ctx);
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].id, older.id);
    assert_eq!(pending[1].id, newer.id);

    // 11s past the first delete, 5s past the second.
    h.clock.advance(Duration::seconds(5));
    let pending = h.undo.pending_for(&h.ctx);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, newer.id);
    assert_eq!(
        pending[0].remaining_window(h.clock.now()),
        Duration::seconds(5)
    );
}
