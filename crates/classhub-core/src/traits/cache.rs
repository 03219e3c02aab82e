//! Entity cache trait for pluggable read-layer backends.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;

/// Trait for the local read cache that optimistic mutations patch.
///
/// Values are JSON documents keyed by strings built in one place (the
/// cache crate's key module). The trait is object-safe so coordinators
/// hold it as `Arc<dyn EntityCache>`.
#[async_trait]
pub trait EntityCache: Send + Sync + std::fmt::Debug + 'static {
    /// Get the cached value for a key. Returns `None` if the key is not
    /// present or has expired.
    async fn read(&self, key: &str) -> AppResult<Option<Value>>;

    /// Write a value for a key, replacing any existing entry.
    async fn write(&self, key: &str, value: Value) -> AppResult<()>;

    /// Remove a key from the cache.
    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Invalidate any in-flight refetches for a key so their (stale)
    /// results are discarded on completion. The cached value itself is
    /// left untouched.
    async fn cancel(&self, key: &str) -> AppResult<()>;

    /// Get a typed value by deserializing the cached JSON.
    async fn read_json<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> AppResult<Option<T>>
    where
        Self: Sized,
    {
        match self.read(key).await? {
            Some(value) => {
                let parsed = serde_json::from_value(value)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Write a typed value by serializing it to JSON.
    async fn write_json<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> AppResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_value(value)?;
        self.write(key, json).await
    }
}
