//! Bulk prefetch of every tile in a map view.
//!
//! Given the bounding box and zoom of the current view, the prefetcher
//! enumerates the covering tiles and, one at a time, downloads each from the
//! tile server and writes it to the store under its canonical key.
//!
//! # Failure Handling
//!
//! A run is best-effort. A tile whose download or store write fails is logged
//! and skipped; the run always continues to the next tile and reports how many
//! tiles made it into the store. Only an empty tile set is refused, before any
//! network or store access.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::progress::{PrefetchProgress, PrefetchSummary};
use super::PrefetchError;
use crate::cache::SharedTileStore;
use crate::coord::{BoundingBox, TileCoord, TileRange, MAX_ZOOM};
use crate::provider::{AsyncHttpClient, TileUrlTemplate};

/// Sequential tile prefetcher.
///
/// Keeps a single tile in flight, which bounds the load on the tile server and
/// keeps progress events ordered.
pub struct Prefetcher<C> {
    client: Arc<C>,
    store: Arc<SharedTileStore>,
    template: TileUrlTemplate,
}

impl<C: AsyncHttpClient> Prefetcher<C> {
    /// Create a prefetcher.
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client for the tile server
    /// * `store` - The tile store shared with the request interceptor
    /// * `template` - URL template addressing individual tiles
    pub fn new(client: Arc<C>, store: Arc<SharedTileStore>, template: TileUrlTemplate) -> Self {
        Self {
            client,
            store,
            template,
        }
    }

    /// Tiles a prefetch of `bbox` at `zoom` would download.
    ///
    /// # Errors
    ///
    /// - `PrefetchError::InvalidZoom` if `zoom` exceeds [`MAX_ZOOM`]
    /// - `PrefetchError::NoTiles` if the box covers no tiles
    pub fn plan(bbox: &BoundingBox, zoom: u8) -> Result<TileRange, PrefetchError> {
        let range =
            TileRange::covering(bbox, zoom).map_err(|_| PrefetchError::InvalidZoom(zoom))?;
        if range.is_empty() {
            return Err(PrefetchError::NoTiles);
        }
        Ok(range)
    }

    /// Prefetch every tile covering `bbox` at `zoom`.
    ///
    /// `on_progress` is called after each tile attempt.
    pub async fn run<F>(
        &self,
        bbox: &BoundingBox,
        zoom: u8,
        on_progress: F,
    ) -> Result<PrefetchSummary, PrefetchError>
    where
        F: Fn(PrefetchProgress) + Send + Sync,
    {
        let range = Self::plan(bbox, zoom)?;
        self.run_range(&range, on_progress).await
    }

    /// Prefetch every tile of `range`.
    pub async fn run_range<F>(
        &self,
        range: &TileRange,
        on_progress: F,
    ) -> Result<PrefetchSummary, PrefetchError>
    where
        F: Fn(PrefetchProgress) + Send + Sync,
    {
        if range.zoom() > MAX_ZOOM {
            return Err(PrefetchError::InvalidZoom(range.zoom()));
        }
        if range.is_empty() {
            return Err(PrefetchError::NoTiles);
        }

        let total = range.len();
        info!(zoom = range.zoom(), tiles = total, "Prefetch started");

        let mut summary = PrefetchSummary {
            total,
            ..Default::default()
        };

        for (index, tile) in range.iter().enumerate() {
            if self.fetch_and_store(&tile).await {
                summary.stored += 1;
            } else {
                summary.failed += 1;
            }

            on_progress(PrefetchProgress {
                completed: index as u64 + 1,
                total,
                stored: summary.stored,
                tile,
            });
        }

        info!(
            total = summary.total,
            stored = summary.stored,
            failed = summary.failed,
            "Prefetch complete"
        );

        Ok(summary)
    }

    /// Download one tile and store it. Returns whether it was stored.
    async fn fetch_and_store(&self, tile: &TileCoord) -> bool {
        let key = tile.key();
        let url = self.template.url(tile);
        debug!(key = %key, url = %url, "Fetching tile");

        let response = match self.client.get(&url).await {
            Ok(response) => response,
            Err(e) => {
                warn!(key = %key, error = %e, "Tile download failed, skipping");
                return false;
            }
        };

        match self.store.put(&key, response.body).await {
            Ok(()) => {
                debug!(key = %key, "Tile stored");
                true
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Tile store write failed, skipping");
                false
            }
        }
    }
}
