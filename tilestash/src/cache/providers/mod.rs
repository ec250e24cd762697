//! Store provider implementations.
//!
//! Each provider implements the `Cache` trait.
//!
//! # Available Providers
//!
//! - [`DiskCacheProvider`]: Durable, versioned on-disk store
//! - [`MemoryCacheProvider`]: In-memory store using moka
//!
//! Most callers go through [`TileStore`](crate::cache::TileStore) instead of
//! using a provider directly:
//!
//! ```ignore
//! use tilestash::cache::{StoreConfig, TileStore};
//!
//! let store = TileStore::open(&StoreConfig::new(cache_dir)).await?;
//! ```

mod disk;
mod memory;

pub use disk::{DiskCacheProvider, StoreStats};
pub use memory::MemoryCacheProvider;
