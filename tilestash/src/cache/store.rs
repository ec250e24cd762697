//! Tile store client.
//!
//! Wraps a generic `Cache` with tile-key translation. This is the only
//! interface the prefetcher and the request interceptor use to reach the
//! store, so both read and write exactly the same keys.
//!
//! # Example
//!
//! ```ignore
//! use tilestash::cache::{SharedTileStore, StoreConfig};
//! use tilestash::coord::TileCoord;
//!
//! let store = SharedTileStore::new(StoreConfig::new(cache_dir));
//!
//! let key = TileCoord::new(5, 10, 12)?.key();
//! store.put(&key, png_bytes).await?;
//! assert!(store.get(&key).await?.is_some());
//! ```

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::OnceCell;
use tracing::info;

use crate::cache::config::StoreConfig;
use crate::cache::providers::{DiskCacheProvider, MemoryCacheProvider};
use crate::cache::traits::{Cache, StoreError};
use crate::coord::TileKey;

/// An open tile store.
///
/// Cheap to clone; clones share the underlying provider.
#[derive(Clone)]
pub struct TileStore {
    cache: Arc<dyn Cache>,
}

impl TileStore {
    /// Wrap an existing provider.
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Open (creating on first use) the durable store described by `config`.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let provider = DiskCacheProvider::open(config).await?;
        Ok(Self::new(provider))
    }

    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCacheProvider::new()))
    }

    /// Look up the payload stored under `key`.
    pub async fn get(&self, key: &TileKey) -> Result<Option<Bytes>, StoreError> {
        self.cache.get(key.as_str()).await
    }

    /// Store `payload` under `key`, replacing any previous payload.
    pub async fn put(&self, key: &TileKey, payload: Bytes) -> Result<(), StoreError> {
        self.cache.set(key.as_str(), payload).await
    }
}

/// Process-wide tile store, opened on first access.
///
/// Both writers hold an `Arc<SharedTileStore>`. The first `get`/`put` opens
/// the store; concurrent first accesses wait on the same open. A failed open
/// is not remembered, so the next access tries again.
pub struct SharedTileStore {
    config: Option<StoreConfig>,
    store: OnceCell<TileStore>,
}

impl SharedTileStore {
    /// A lazily opened durable store.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config: Some(config),
            store: OnceCell::new(),
        }
    }

    /// A shared handle around an already open store.
    pub fn from_store(store: TileStore) -> Self {
        Self {
            config: None,
            store: OnceCell::new_with(Some(store)),
        }
    }

    /// The open store, opening it if this is the first access.
    pub async fn handle(&self) -> Result<&TileStore, StoreError> {
        self.store
            .get_or_try_init(|| async {
                let config = self.config.as_ref().ok_or_else(|| {
                    StoreError::Unavailable("no store configured".to_string())
                })?;
                let store = TileStore::open(config).await?;
                info!(dir = %config.store_dir().display(), "Tile store ready");
                Ok::<_, StoreError>(store)
            })
            .await
    }

    /// Look up the payload stored under `key`.
    pub async fn get(&self, key: &TileKey) -> Result<Option<Bytes>, StoreError> {
        self.handle().await?.get(key).await
    }

    /// Store `payload` under `key`.
    pub async fn put(&self, key: &TileKey, payload: Bytes) -> Result<(), StoreError> {
        self.handle().await?.put(key, payload).await
    }
}
