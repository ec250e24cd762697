//! Coordinate handling
//!
//! Provides the tile coordinate type, the canonical cache key derived from
//! it, and the Web Mercator conversion from geographic coordinates
//! (latitude/longitude) to tile indices.

mod bounds;
mod key;
mod types;

pub use bounds::{BoundingBox, LatLng, TileRange, TileRangeIter};
pub use key::TileKey;
pub use types::{grid_size, CoordError, TileCoord, MAX_ZOOM};

use std::f64::consts::PI;

/// Converts geographic coordinates to raw tile indices.
///
/// Applies the slippy-map formula without any range checks:
///
/// ```text
/// x = floor((lng + 180) / 360 * 2^z)
/// y = floor((1 - ln(tan(lat) + 1 / cos(lat)) / π) / 2 * 2^z)
/// ```
///
/// Points outside the Web Mercator square produce indices outside
/// `[0, 2^z)`; callers clamp them. At or beyond a pole the row saturates to
/// `i64::MIN` (north) or `i64::MAX` (south). Returns `None` when either index is
/// NaN or `zoom` exceeds [`MAX_ZOOM`].
#[inline]
pub fn to_tile_index(lat: f64, lng: f64, zoom: u8) -> Option<(i64, i64)> {
    if zoom > MAX_ZOOM {
        return None;
    }
    let n = grid_size(zoom) as f64;

    let x = ((lng + 180.0) / 360.0 * n).floor();

    // The row diverges at the poles; floating point tan/cos never get there exactly.
    let y = if lat <= -90.0 {
        f64::INFINITY
    } else if lat >= 90.0 {
        f64::NEG_INFINITY
    } else {
        let lat_rad = lat * PI / 180.0;
        ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor()
    };

    if x.is_nan() || y.is_nan() {
        return None;
    }

    // `as` saturates at the i64 bounds, which clamping reduces to the grid edge.
    Some((x as i64, y as i64))
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lng(tile: &TileCoord) -> LatLng {
    let n = grid_size(tile.z) as f64;

    let lng = tile.x as f64 / n * 360.0 - 180.0;

    let y = tile.y as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    LatLng::new(lat, lng)
}
