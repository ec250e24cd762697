//! Bulk prefetch for offline use.
//!
//! Downloads every tile covering a map view into the tile store ahead of time,
//! so the request interceptor can serve the region without a network.
//!
//! ```ignore
//! use tilestash::coord::BoundingBox;
//! use tilestash::prefetch::Prefetcher;
//!
//! let prefetcher = Prefetcher::new(client, store, template);
//! let bbox = BoundingBox::from_edges(14.55, 120.92, 14.65, 121.05);
//! let summary = prefetcher
//!     .run(&bbox, 13, |p| println!("{} / {}", p.completed, p.total))
//!     .await?;
//! ```

mod prefetcher;
mod progress;

pub use prefetcher::Prefetcher;
pub use progress::{PrefetchProgress, PrefetchSummary};

use thiserror::Error;

use crate::coord::MAX_ZOOM;

/// Errors that refuse a prefetch before it starts.
///
/// Per-tile failures never surface here; they are logged and counted in
/// [`PrefetchSummary::failed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefetchError {
    /// The bounding box covers no tiles.
    #[error("No tiles to download")]
    NoTiles,

    /// Zoom level above [`MAX_ZOOM`].
    #[error("Invalid zoom level: {0} (max: {max})", max = MAX_ZOOM)]
    InvalidZoom(u8),
}
