//! TileStash - Offline map tile cache
//!
//! Keeps raster map tiles on disk so a map stays usable without a network.
//! Two independent writers fill one durable store:
//!
//! - the [`prefetch`] module downloads every tile of a map view ahead of time
//! - the [`intercept`] module serves tile requests from the store and saves
//!   whatever it has to fetch
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use tilestash::cache::{SharedTileStore, StoreConfig};
//! use tilestash::coord::BoundingBox;
//! use tilestash::intercept::{RequestPipeline, TileInterceptor};
//! use tilestash::prefetch::Prefetcher;
//! use tilestash::provider::{ReqwestClient, TileUrlTemplate};
//!
//! let client = Arc::new(ReqwestClient::new()?);
//! let store = Arc::new(SharedTileStore::new(StoreConfig::new(cache_dir)));
//!
//! // Download a region for offline use
//! let prefetcher = Prefetcher::new(client.clone(), store.clone(), TileUrlTemplate::default());
//! prefetcher.run(&BoundingBox::from_edges(14.55, 120.92, 14.65, 121.05), 13, |_| {}).await?;
//!
//! // Serve map traffic cache-first
//! let interceptor = Arc::new(TileInterceptor::new(client.clone(), store));
//! let mut pipeline = RequestPipeline::new(client);
//! interceptor.install(&mut pipeline);
//! ```

pub mod cache;
pub mod config;
pub mod coord;
pub mod intercept;
pub mod logging;
pub mod prefetch;
pub mod provider;
pub mod server;

/// Version of the TileStash library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
