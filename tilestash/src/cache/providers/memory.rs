//! In-memory store provider using moka.
//!
//! This provider wraps `moka::future::Cache` to provide an async-safe,
//! lock-free in-memory store. It is built without a capacity or TTL, so
//! nothing is ever evicted; entries live as long as the provider.
//!
//! Used for ephemeral stores and in tests.

use bytes::Bytes;
use moka::future::Cache as MokaCache;

use crate::cache::traits::{BoxFuture, Cache, StoreError};

/// In-memory store provider using moka.
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: MokaCache<String, Bytes>,
}

impl MemoryCacheProvider {
    /// Create a new, empty, unbounded provider.
    pub fn new() -> Self {
        Self {
            cache: MokaCache::builder().build(),
        }
    }

    /// Number of stored entries.
    ///
    /// moka updates its counters lazily; pending maintenance is flushed first.
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

impl Default for MemoryCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache for MemoryCacheProvider {
    fn set(&self, key: &str, value: Bytes) -> BoxFuture<'_, Result<(), StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.cache.insert(key, value).await;
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Bytes>, StoreError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.get(&key).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider_new() {
        let provider = MemoryCacheProvider::new();
        assert_eq!(provider.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_memory_provider_set_and_get() {
        let provider = MemoryCacheProvider::new();

        provider.set("5/10/12", Bytes::from_static(b"png")).await.unwrap();

        let value = provider.get("5/10/12").await.unwrap();
        assert_eq!(value, Some(Bytes::from_static(b"png")));
    }

    #[tokio::test]
    async fn test_memory_provider_get_missing() {
        let provider = MemoryCacheProvider::new();

        let value = provider.get("nonexistent").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_memory_provider_replace_existing() {
        let provider = MemoryCacheProvider::new();

        provider.set("key1", Bytes::from_static(&[1, 2, 3])).await.unwrap();
        provider.set("key1", Bytes::from_static(&[4, 5, 6, 7])).await.unwrap();

        let value = provider.get("key1").await.unwrap();
        assert_eq!(value, Some(Bytes::from_static(&[4, 5, 6, 7])));
        assert_eq!(provider.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_memory_provider_keeps_large_entries() {
        let provider = MemoryCacheProvider::new();

        for i in 0..64 {
            let key = format!("8/{}/0", i);
            provider.set(&key, Bytes::from(vec![0u8; 64 * 1024])).await.unwrap();
        }

        assert_eq!(provider.entry_count().await, 64);
    }

    #[tokio::test]
    async fn test_memory_provider_concurrent_access() {
        use std::sync::Arc;

        let provider = Arc::new(MemoryCacheProvider::new());
        let mut handles = Vec::new();

        for i in 0..50 {
            let provider = Arc::clone(&provider);
            handles.push(tokio::spawn(async move {
                let key = format!("key{}", i);
                let data = Bytes::from(vec![i as u8; 100]);

                provider.set(&key, data.clone()).await.unwrap();
                let result = provider.get(&key).await.unwrap();
                assert_eq!(result, Some(data));
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(provider.entry_count().await, 50);
    }
}
