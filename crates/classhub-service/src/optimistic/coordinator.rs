//! Coordinates optimistic cache patches around server round-trips.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use classhub_core::result::AppResult;
use classhub_core::traits::cache::EntityCache;

/// How one optimistic mutation settled.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The round-trip completed and the cache now holds this value.
    Applied(Value),
    /// A newer mutation for the same key started before this one
    /// completed; the newer one settles the key, this one changed
    /// nothing on completion.
    Superseded,
}

impl MutationOutcome {
    /// True when this mutation's value is what the cache holds.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// True when a newer mutation took the key over.
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }

    /// The applied value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Superseded => None,
        }
    }
}

/// Runs the optimistic mutation protocol against the read cache.
///
/// Per key and in order: cancel in-flight refetches, snapshot the
/// current value, patch in the predicted value, then run the server
/// round-trip. On success the server's returned value replaces the
/// prediction (or the prediction stands when the server returns
/// nothing); on failure the snapshot is written back. Rapid mutations
/// of one key resolve last-write-wins: each new mutation bumps the
/// key's epoch, and a completion whose epoch is no longer current
/// neither reconciles nor rolls back.
///
/// A per-key mutex serializes the patch phase and the completion phase
/// so their cache writes cannot interleave; the round-trip itself runs
/// outside the lock, so sends for the same key still overlap.
pub struct OptimisticMutationCoordinator {
    /// The read cache being patched.
    cache: Arc<dyn EntityCache>,
    /// Monotonic per-key mutation counter.
    epochs: DashMap<String, u64>,
    /// Per-key phase locks.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl OptimisticMutationCoordinator {
    /// Creates a new coordinator over the given cache.
    pub fn new(cache: Arc<dyn EntityCache>) -> Self {
        Self {
            cache,
            epochs: DashMap::new(),
            locks: DashMap::new(),
        }
    }

    /// Apply `predicted` to `key` immediately, then settle it against
    /// the outcome of `send`.
    ///
    /// `send` resolves to the server's authoritative value, or `None`
    /// when the server confirms without returning one. On a `send`
    /// error the cache is rolled back to the pre-patch snapshot and the
    /// error is returned; when a newer mutation has superseded this one
    /// the error is returned without touching the cache.
    pub async fn mutate<F, Fut>(
        &self,
        key: &str,
        predicted: Value,
        send: F,
    ) -> AppResult<MutationOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Option<Value>>>,
    {
        let lock = self.lock_for(key);

        let (snapshot, epoch) = {
            let _guard = lock.lock().await;
            self.cache.cancel(key).await?;
            let snapshot = self.cache.read(key).await?;
            let epoch = self.bump_epoch(key);
            self.cache.write(key, predicted.clone()).await?;
            debug!(key = %key, epoch, "Applied optimistic patch");
            (snapshot, epoch)
        };

        let result = send().await;

        let _guard = lock.lock().await;
        let superseded = self.current_epoch(key) != epoch;

        match result {
            Ok(server_value) => {
                if superseded {
                    debug!(key = %key, epoch, "Mutation superseded, dropping its outcome");
                    return Ok(MutationOutcome::Superseded);
                }
                let value = match server_value {
                    Some(value) => {
                        self.cache.write(key, value.clone()).await?;
                        value
                    }
                    // The prediction is still in place; the server had
                    // nothing newer to say.
                    None => predicted,
                };
                Ok(MutationOutcome::Applied(value))
            }
            Err(err) => {
                if superseded {
                    debug!(key = %key, epoch, "Superseded mutation failed, leaving cache alone");
                    return Err(err);
                }
                warn!(key = %key, error = %err, "Mutation failed, rolling back");
                let rollback = match &snapshot {
                    Some(previous) => self.cache.write(key, previous.clone()).await,
                    None => self.cache.remove(key).await,
                };
                if let Err(rollback_err) = rollback {
                    warn!(key = %key, error = %rollback_err, "Rollback write failed");
                }
                Err(err)
            }
        }
    }

    /// The current epoch for a key; zero before its first mutation.
    fn current_epoch(&self, key: &str) -> u64 {
        self.epochs.get(key).map(|entry| *entry).unwrap_or(0)
    }

    /// Advance the key's epoch and return the new value.
    fn bump_epoch(&self, key: &str) -> u64 {
        let mut entry = self.epochs.entry(key.to_owned()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// The phase lock for a key, created on first use.
    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl std::fmt::Debug for OptimisticMutationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimisticMutationCoordinator")
            .field("keys", &self.epochs.len())
            .finish_non_exhaustive()
    }
}
