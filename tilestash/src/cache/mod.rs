//! Persistent tile store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────────┐
//! │  Prefetcher      │     │  TileInterceptor     │
//! └────────┬─────────┘     └──────────┬───────────┘
//!          │   TileKey (z/x/y)        │
//!          ▼                          ▼
//! ┌─────────────────────────────────────────────────┐
//! │      SharedTileStore → TileStore                │
//! │      (lazy open, tile-key translation)          │
//! └────────────────────────┬────────────────────────┘
//!                          ▼
//! ┌─────────────────────────────────────────────────┐
//! │      Arc<dyn Cache>                             │
//! │      DiskCacheProvider | MemoryCacheProvider    │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! The two writers never call each other; the store is the only thing they
//! share.

mod config;
mod providers;
mod store;
mod traits;

pub use config::{StoreConfig, STORE_NAME, STORE_VERSION, TILES_COLLECTION, TILE_CONTENT_TYPE};
pub use providers::{DiskCacheProvider, MemoryCacheProvider, StoreStats};
pub use store::{SharedTileStore, TileStore};
pub use traits::{BoxFuture, Cache, StoreError};
