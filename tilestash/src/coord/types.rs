//! Tile coordinate types.

use std::fmt;

use thiserror::Error;

/// Maximum zoom level accepted by the cache.
///
/// At zoom 30 the tile grid is 2^30 tiles wide, which still fits the `u32`
/// column and row indices.
pub const MAX_ZOOM: u8 = 30;

/// Errors produced when building or parsing tile coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    /// Zoom level above [`MAX_ZOOM`].
    #[error("Invalid zoom level: {0} (max: {max})", max = MAX_ZOOM)]
    InvalidZoom(u8),

    /// Column or row outside `[0, 2^z)`.
    #[error("Tile {x},{y} is outside the grid at zoom {z}")]
    OutOfRange { z: u8, x: u32, y: u32 },

    /// Text that is not a canonical `z/x/y` key.
    #[error("Malformed tile key: '{0}'")]
    MalformedKey(String),
}

/// One raster tile in the standard slippy-map quad-tree.
///
/// `x` grows eastward from the antimeridian, `y` grows southward from the
/// northern edge of the Web Mercator square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Zoom level.
    pub z: u8,
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl TileCoord {
    /// Create a validated tile coordinate.
    pub fn new(z: u8, x: u32, y: u32) -> Result<Self, CoordError> {
        if z > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(z));
        }
        let n = grid_size(z);
        if u64::from(x) >= n || u64::from(y) >= n {
            return Err(CoordError::OutOfRange { z, x, y });
        }
        Ok(Self { z, x, y })
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Number of tiles along one edge of the grid at `zoom` (`2^zoom`).
#[inline]
pub fn grid_size(zoom: u8) -> u64 {
    1u64 << zoom
}
