//! Geographic bounding boxes and the tile ranges that cover them.

use super::to_tile_index;
use super::types::{grid_size, CoordError, TileCoord, MAX_ZOOM};

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A geographic rectangle given by its south-west and north-east corners.
///
/// The corners come straight from the map view and are not validated: they
/// may be swapped, wrap the antimeridian, or extend past the poles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl BoundingBox {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Build from `south, west, north, east` in degrees.
    pub fn from_edges(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }
}

/// An inclusive rectangle of tiles at one zoom level.
///
/// Bounds are always inside the grid. A range is either empty or holds
/// `(max_x - min_x + 1) * (max_y - min_y + 1)` unique tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    zoom: u8,
    bounds: Option<(u32, u32, u32, u32)>,
}

impl TileRange {
    /// Build a range from two corner indices.
    ///
    /// The corners are ordered (`min <= max` on each axis) and then clamped
    /// into `[0, 2^zoom - 1]`, so a range never names a tile outside the grid.
    ///
    /// # Errors
    ///
    /// `CoordError::InvalidZoom` if `zoom` exceeds [`MAX_ZOOM`].
    pub fn new(
        zoom: u8,
        (x0, y0): (i64, i64),
        (x1, y1): (i64, i64),
    ) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let last = (grid_size(zoom) - 1) as i64;
        let clamp = |v: i64| v.clamp(0, last) as u32;

        let (min_x, max_x) = (x0.min(x1), x0.max(x1));
        let (min_y, max_y) = (y0.min(y1), y0.max(y1));

        Ok(Self {
            zoom,
            bounds: Some((clamp(min_x), clamp(max_x), clamp(min_y), clamp(max_y))),
        })
    }

    /// A range without tiles.
    pub fn empty(zoom: u8) -> Self {
        Self { zoom, bounds: None }
    }

    /// Tiles covering `bbox` at `zoom`.
    ///
    /// Empty when either corner has no tile index (a NaN coordinate). A corner
    /// at or past a pole clamps to the edge row.
    pub fn covering(bbox: &BoundingBox, zoom: u8) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let sw = to_tile_index(bbox.south_west.lat, bbox.south_west.lng, zoom);
        let ne = to_tile_index(bbox.north_east.lat, bbox.north_east.lng, zoom);

        match (sw, ne) {
            (Some(sw), Some(ne)) => Self::new(zoom, sw, ne),
            _ => Ok(Self::empty(zoom)),
        }
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Number of tiles in the range.
    pub fn len(&self) -> u64 {
        match self.bounds {
            Some((min_x, max_x, min_y, max_y)) => {
                u64::from(max_x - min_x + 1) * u64::from(max_y - min_y + 1)
            }
            None => 0,
        }
    }

    /// Iterate the tiles column by column (x outer, y inner).
    pub fn iter(&self) -> TileRangeIter {
        TileRangeIter {
            zoom: self.zoom,
            bounds: self.bounds,
            next: self.bounds.map(|(min_x, _, min_y, _)| (min_x, min_y)),
        }
    }
}

impl IntoIterator for &TileRange {
    type Item = TileCoord;
    type IntoIter = TileRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the tiles of a [`TileRange`].
#[derive(Debug, Clone)]
pub struct TileRangeIter {
    zoom: u8,
    bounds: Option<(u32, u32, u32, u32)>,
    next: Option<(u32, u32)>,
}

impl Iterator for TileRangeIter {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, max_x, min_y, max_y) = self.bounds?;
        let (x, y) = self.next?;

        self.next = if y < max_y {
            Some((x, y + 1))
        } else if x < max_x {
            Some((x + 1, min_y))
        } else {
            None
        };

        Some(TileCoord { z: self.zoom, x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_enumerates_cartesian_product() {
        let range = TileRange::new(10, (2, 5), (4, 6)).unwrap();

        let tiles: Vec<_> = range.iter().collect();

        assert_eq!(range.len(), 6);
        assert_eq!(tiles.len(), 6);
        let unique: HashSet<_> = tiles.iter().collect();
        assert_eq!(unique.len(), 6);
        assert!(tiles.iter().all(|t| t.z == 10 && t.x <= 1023 && t.y <= 1023));
        assert_eq!(tiles[0], TileCoord { z: 10, x: 2, y: 5 });
        assert_eq!(tiles[1], TileCoord { z: 10, x: 2, y: 6 });
        assert_eq!(tiles[5], TileCoord { z: 10, x: 4, y: 6 });
    }

    #[test]
    fn test_orders_swapped_corners() {
        let range = TileRange::new(10, (4, 6), (2, 5)).unwrap();
        assert_eq!(range, TileRange::new(10, (2, 5), (4, 6)).unwrap());
    }

    #[test]
    fn test_clamps_into_grid() {
        let range = TileRange::new(2, (-5, -1), (9, 2)).unwrap();

        let tiles: Vec<_> = range.iter().collect();

        // x clamps to 0..=3, y to 0..=2
        assert_eq!(range.len(), 12);
        assert!(tiles.iter().all(|t| t.x <= 3 && t.y <= 3));
    }

    #[test]
    fn test_single_tile_range() {
        let range = TileRange::new(5, (10, 12), (10, 12)).unwrap();
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![TileCoord { z: 5, x: 10, y: 12 }]);
    }

    #[test]
    fn test_empty_range() {
        let range = TileRange::empty(7);
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert_eq!(range.iter().count(), 0);
    }

    #[test]
    fn test_covering_whole_world_at_zoom_one() {
        let bbox = BoundingBox::from_edges(-89.0, -180.0, 89.0, 179.9);
        let range = TileRange::covering(&bbox, 1).unwrap();
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_covering_nan_bbox_is_empty() {
        let bbox = BoundingBox::from_edges(f64::NAN, 0.0, 10.0, 10.0);
        assert!(TileRange::covering(&bbox, 10).unwrap().is_empty());
    }

    #[test]
    fn test_covering_box_touching_south_pole() {
        let bbox = BoundingBox::from_edges(-90.0, -180.0, 90.0, 180.0);

        let range = TileRange::covering(&bbox, 2).unwrap();

        assert_eq!(range.len(), 16);
        let rows: HashSet<_> = range.iter().map(|t| t.y).collect();
        assert_eq!(rows, (0..4).collect::<HashSet<u32>>());
    }

    #[test]
    fn test_zoom_above_max_is_rejected() {
        assert_eq!(
            TileRange::new(MAX_ZOOM + 10, (0, 0), (1, 1)),
            Err(CoordError::InvalidZoom(40))
        );
        assert_eq!(
            TileRange::new(64, (0, 0), (1, 1)),
            Err(CoordError::InvalidZoom(64))
        );
        let bbox = BoundingBox::from_edges(0.0, 0.0, 1.0, 1.0);
        assert_eq!(
            TileRange::covering(&bbox, u8::MAX),
            Err(CoordError::InvalidZoom(u8::MAX))
        );
    }

    #[test]
    fn test_max_zoom_tiles_are_valid() {
        let last = grid_size(MAX_ZOOM) as i64 - 1;
        let range = TileRange::new(MAX_ZOOM, (last - 1, 0), (last + 5, 1)).unwrap();

        for tile in &range {
            assert!(TileCoord::new(tile.z, tile.x, tile.y).is_ok());
        }
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_covering_manila_view() {
        // Roughly the default view of a 1280x720 map at zoom 13 over Manila
        let bbox = BoundingBox::from_edges(14.55, 120.92, 14.65, 121.05);
        let range = TileRange::covering(&bbox, 13).unwrap();

        assert!(!range.is_empty());
        for tile in &range {
            assert!((6847..=6851).contains(&tile.x));
            assert!((3757..=3762).contains(&tile.y));
        }
    }

    proptest! {
        #[test]
        fn prop_range_is_inside_grid_and_unique(
            zoom in 0u8..=8,
            x0 in -300i64..300,
            y0 in -300i64..300,
            x1 in -300i64..300,
            y1 in -300i64..300,
        ) {
            let range = TileRange::new(zoom, (x0, y0), (x1, y1)).unwrap();
            let n = grid_size(zoom);

            let tiles: Vec<_> = range.iter().collect();
            let unique: HashSet<_> = tiles.iter().collect();

            prop_assert_eq!(tiles.len() as u64, range.len());
            prop_assert_eq!(unique.len(), tiles.len());
            for tile in tiles {
                prop_assert!(u64::from(tile.x) < n && u64::from(tile.y) < n);
            }
        }
    }
}
