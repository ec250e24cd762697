//! Tile URL matching.
//!
//! A request is a tile request when it is a GET whose URL, with any query
//! string or fragment removed, ends in `/{z}/{x}/{y}.png`. Examples:
//! - `https://a.tile.openstreetmap.org/5/10/12.png`
//! - `http://localhost:8088/5/10/12.png?v=2`
//!
//! Segments are parsed numerically, so `/05/010/012.png` maps to the same key
//! as `/5/10/12.png`. Coordinates outside the tile grid are not tile requests.

use std::sync::OnceLock;

use regex::Regex;
use reqwest::Method;

use crate::coord::{TileCoord, TileKey};

/// Tile path pattern.
///
/// We capture:
/// - Group 1: zoom level
/// - Group 2: tile column (x)
/// - Group 3: tile row (y)
fn tile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/(\d+)/(\d+)/(\d+)\.png$").unwrap())
}

/// The URL with its query string and fragment removed.
fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Parse the tile coordinate addressed by `url`, if any.
///
/// # Returns
///
/// `None` if the URL does not end in a tile path or the coordinate is not on
/// the tile grid.
pub fn parse_tile_url(url: &str) -> Option<TileCoord> {
    let captures = tile_pattern().captures(strip_query(url))?;

    let z: u8 = captures[1].parse().ok()?;
    let x: u32 = captures[2].parse().ok()?;
    let y: u32 = captures[3].parse().ok()?;

    TileCoord::new(z, x, y).ok()
}

/// The store key for a request, or `None` if it is not a tile request.
pub fn tile_key_for(method: &Method, url: &str) -> Option<TileKey> {
    if *method != Method::GET {
        return None;
    }
    parse_tile_url(url).map(TileKey::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(url: &str) -> Option<String> {
        tile_key_for(&Method::GET, url).map(|k| k.to_string())
    }

    #[test]
    fn test_matches_tile_url() {
        assert_eq!(
            key("https://a.tile.openstreetmap.org/5/10/12.png"),
            Some("5/10/12".to_string())
        );
    }

    #[test]
    fn test_ignores_query_and_fragment() {
        assert_eq!(key("http://localhost/5/10/12.png?v=1"), Some("5/10/12".to_string()));
        assert_eq!(key("http://localhost/5/10/12.png#top"), Some("5/10/12".to_string()));
        assert_eq!(key("http://localhost/5/10/12.png?a=1#b"), Some("5/10/12".to_string()));
    }

    #[test]
    fn test_query_cannot_forge_match() {
        assert_eq!(key("http://localhost/search?q=/5/10/12.png"), None);
    }

    #[test]
    fn test_leading_zeros_normalize() {
        assert_eq!(key("http://localhost/05/010/012.png"), Some("5/10/12".to_string()));
    }

    #[test]
    fn test_non_tile_urls_pass() {
        assert_eq!(key("http://localhost/index.html"), None);
        assert_eq!(key("http://localhost/5/10/12.jpg"), None);
        assert_eq!(key("http://localhost/5/10.png"), None);
        assert_eq!(key("http://localhost/5/a/12.png"), None);
        assert_eq!(key("http://localhost/5/10/12.png/extra"), None);
    }

    #[test]
    fn test_out_of_grid_passes() {
        assert_eq!(key("http://localhost/1/2/0.png"), None);
        assert_eq!(key("http://localhost/31/0/0.png"), None);
        assert_eq!(key("http://localhost/300/0/0.png"), None);
        assert_eq!(key("http://localhost/4/99999999999/0.png"), None);
    }

    #[test]
    fn test_only_get_is_matched() {
        let url = "http://localhost/5/10/12.png";
        assert!(tile_key_for(&Method::GET, url).is_some());
        assert!(tile_key_for(&Method::POST, url).is_none());
        assert!(tile_key_for(&Method::HEAD, url).is_none());
    }

    #[test]
    fn test_parse_tile_url_coord() {
        let coord = parse_tile_url("https://tiles.test/13/6849/3760.png").unwrap();
        assert_eq!((coord.z, coord.x, coord.y), (13, 6849, 3760));
    }
}
