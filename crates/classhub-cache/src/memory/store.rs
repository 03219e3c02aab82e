//! In-memory entity cache using the moka crate.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use moka::future::Cache;
use serde_json::Value;
use tracing::debug;

use classhub_core::config::cache::CacheConfig;
use classhub_core::result::AppResult;
use classhub_core::traits::cache::EntityCache;

/// In-memory entity cache with refetch cancellation.
///
/// Values are JSON documents in a moka cache. Each key additionally has
/// a generation counter: `cancel` bumps it, and a refetch that began
/// under an older generation is discarded when it completes. This is
/// what lets an optimistic patch cut off reads that are already in
/// flight: when the late server response arrives it fails the
/// generation check and never clobbers the patched value.
#[derive(Debug, Clone)]
pub struct MemoryEntityCache {
    /// The underlying moka cache.
    cache: Cache<String, Value>,
    /// Key → generation. Bumped on every cancel.
    generations: Arc<DashMap<String, u64>>,
}

/// Proof that a refetch began under a specific generation of a key.
///
/// Obtained from [`MemoryEntityCache::begin_refetch`] before the read
/// request is sent; handed back to
/// [`MemoryEntityCache::complete_refetch`] with the response.
#[derive(Debug, Clone)]
pub struct RefetchTicket {
    key: String,
    generation: u64,
}

impl RefetchTicket {
    /// The key the refetch is for.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl MemoryEntityCache {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.time_to_live_seconds))
            .build();

        Self {
            cache,
            generations: Arc::new(DashMap::new()),
        }
    }

    /// Current generation of a key. Keys that were never cancelled are
    /// at generation zero.
    fn generation(&self, key: &str) -> u64 {
        self.generations.get(key).map(|g| *g).unwrap_or(0)
    }

    /// Start a refetch for a key, capturing its current generation.
    pub fn begin_refetch(&self, key: &str) -> RefetchTicket {
        RefetchTicket {
            key: key.to_string(),
            generation: self.generation(key),
        }
    }

    /// Complete a refetch. The value is written only when no cancel
    /// happened since the ticket was issued; returns whether the write
    /// was applied.
    pub async fn complete_refetch(&self, ticket: &RefetchTicket, value: Value) -> AppResult<bool> {
        if self.generation(&ticket.key) != ticket.generation {
            debug!(key = %ticket.key, "Stale refetch discarded");
            return Ok(false);
        }
        self.cache.insert(ticket.key.clone(), value).await;
        Ok(true)
    }
}

#[async_trait]
impl EntityCache for MemoryEntityCache {
    async fn read(&self, key: &str) -> AppResult<Option<Value>> {
        Ok(self.cache.get(key).await)
    }

    async fn write(&self, key: &str, value: Value) -> AppResult<()> {
        self.cache.insert(key.to_string(), value).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.cache.remove(key).await;
        Ok(())
    }

    async fn cancel(&self, key: &str) -> AppResult<()> {
        self.generations
            .entry(key.to_string())
            .and_modify(|g| *g += 1)
            .or_insert(1);
        debug!(key, "In-flight refetches cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cache() -> MemoryEntityCache {
        MemoryEntityCache::new(&CacheConfig::default())
    }

    #[tokio::test]
    async fn test_write_read() {
        let cache = make_cache();
        cache
            .write("classhub:students:1", serde_json::json!({"name": "Mina"}))
            .await
            .unwrap();

        let value = cache.read("classhub:students:1").await.unwrap();
        assert_eq!(value, Some(serde_json::json!({"name": "Mina"})));
    }

    #[tokio::test]
    async fn test_remove() {
        let cache = make_cache();
        cache
            .write("key", serde_json::json!("value"))
            .await
            .unwrap();
        cache.remove("key").await.unwrap();
        assert_eq!(cache.read("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cancel_leaves_value_untouched() {
        let cache = make_cache();
        cache
            .write("key", serde_json::json!("value"))
            .await
            .unwrap();
        cache.cancel("key").await.unwrap();
        assert_eq!(
            cache.read("key").await.unwrap(),
            Some(serde_json::json!("value"))
        );
    }

    #[tokio::test]
    async fn test_refetch_applies_without_cancel() {
        let cache = make_cache();
        let ticket = cache.begin_refetch("key");

        let applied = cache
            .complete_refetch(&ticket, serde_json::json!("fresh"))
            .await
            .unwrap();
        assert!(applied);
        assert_eq!(
            cache.read("key").await.unwrap(),
            Some(serde_json::json!("fresh"))
        );
    }

    #[tokio::test]
    async fn test_cancel_discards_in_flight_refetch() {
        let cache = make_cache();
        cache
            .write("key", serde_json::json!("optimistic"))
            .await
            .unwrap();

        // Refetch started, then a cancel (an optimistic patch) intervenes.
        let ticket = cache.begin_refetch("key");
        cache.cancel("key").await.unwrap();

        let applied = cache
            .complete_refetch(&ticket, serde_json::json!("stale"))
            .await
            .unwrap();
        assert!(!applied);
        assert_eq!(
            cache.read("key").await.unwrap(),
            Some(serde_json::json!("optimistic"))
        );
    }

    #[tokio::test]
    async fn test_refetch_after_cancel_applies() {
        let cache = make_cache();
        cache.cancel("key").await.unwrap();

        // A refetch begun after the cancel is current again.
        let ticket = cache.begin_refetch("key");
        let applied = cache
            .complete_refetch(&ticket, serde_json::json!("fresh"))
            .await
            .unwrap();
        assert!(applied);
    }

    #[tokio::test]
    async fn test_typed_roundtrip() {
        let cache = make_cache();
        let value = serde_json::json!({"status": "present", "count": 3});
        cache.write_json("key", &value).await.unwrap();
        let parsed: Option<Value> = cache.read_json("key").await.unwrap();
        assert_eq!(parsed, Some(value));
    }
}
