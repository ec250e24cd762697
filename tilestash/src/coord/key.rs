//! Canonical cache key for a tile.
//!
//! Every writer of the tile store derives its keys through [`TileKey`]. The
//! prefetcher and the request interceptor never talk to each other, so a tile
//! stored by one is only visible to the other if both render the exact same
//! text for the same coordinate.
//!
//! # Key Format
//!
//! `{z}/{x}/{y}` in plain decimal, no padding, no sign. Example: `5/10/12`.

use std::fmt;
use std::str::FromStr;

use super::types::{CoordError, TileCoord};

/// Canonical `z/x/y` key of a [`TileCoord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileKey {
    coord: TileCoord,
    text: String,
}

impl TileKey {
    /// Encode a coordinate.
    pub fn new(coord: TileCoord) -> Self {
        Self {
            text: format!("{}/{}/{}", coord.z, coord.x, coord.y),
            coord,
        }
    }

    /// Decode a key.
    ///
    /// Only canonical text is accepted: three `/`-separated decimal fields,
    /// without leading zeros, inside the tile grid. Anything else would encode
    /// back to a different string and is rejected.
    pub fn parse(text: &str) -> Result<Self, CoordError> {
        let malformed = || CoordError::MalformedKey(text.to_string());

        let mut parts = text.split('/');
        let (Some(z), Some(x), Some(y), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let z = parse_field(z).ok_or_else(malformed)?;
        let x = parse_field(x).ok_or_else(malformed)?;
        let y = parse_field(y).ok_or_else(malformed)?;
        let z = u8::try_from(z).map_err(|_| malformed())?;

        TileCoord::new(z, x, y).map(Self::new)
    }

    /// The coordinate this key was derived from.
    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// The key text as stored.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Parse one canonical decimal field.
fn parse_field(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if field.len() > 1 && field.starts_with('0') {
        return None;
    }
    field.parse().ok()
}

impl TileCoord {
    /// Encode this coordinate as its cache key.
    pub fn key(&self) -> TileKey {
        TileKey::new(*self)
    }
}

impl From<TileCoord> for TileKey {
    fn from(coord: TileCoord) -> Self {
        Self::new(coord)
    }
}

impl FromStr for TileKey {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TileKey {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::MAX_ZOOM;
    use proptest::prelude::*;

    #[test]
    fn test_encode_format() {
        let key = TileCoord::new(5, 10, 12).unwrap().key();
        assert_eq!(key.as_str(), "5/10/12");
    }

    #[test]
    fn test_encode_has_no_padding() {
        let key = TileKey::new(TileCoord::new(3, 0, 7).unwrap());
        assert_eq!(key.to_string(), "3/0/7");
    }

    #[test]
    fn test_parse_canonical_key() {
        let key: TileKey = "5/10/12".parse().unwrap();
        assert_eq!(key.coord(), TileCoord { z: 5, x: 10, y: 12 });
    }

    #[test]
    fn test_parse_rejects_non_canonical_text() {
        for text in [
            "", "5/10", "5/10/12/1", "05/10/12", "5/010/12", "5/+1/12", "5/-1/12", "5//12",
            "a/b/c", "5/10/12.png", " 5/10/12",
        ] {
            assert!(
                matches!(TileKey::parse(text), Err(CoordError::MalformedKey(_))),
                "expected '{}' to be rejected",
                text
            );
        }
    }

    #[test]
    fn test_parse_rejects_out_of_grid() {
        assert!(matches!(
            TileKey::parse("5/32/0"),
            Err(CoordError::OutOfRange { .. })
        ));
        assert!(matches!(
            TileKey::parse("31/0/0"),
            Err(CoordError::InvalidZoom(31))
        ));
        assert!(TileKey::parse("300/0/0").is_err());
    }

    #[test]
    fn test_zero_is_canonical() {
        let key = TileKey::parse("0/0/0").unwrap();
        assert_eq!(key.coord(), TileCoord { z: 0, x: 0, y: 0 });
    }

    fn valid_coord() -> impl Strategy<Value = TileCoord> {
        (0..=MAX_ZOOM).prop_flat_map(|z| {
            let n = 1u32 << z;
            (Just(z), 0..n, 0..n).prop_map(|(z, x, y)| TileCoord { z, x, y })
        })
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(coord in valid_coord()) {
            let key = coord.key();
            let decoded = TileKey::parse(key.as_str()).unwrap();
            prop_assert_eq!(decoded.coord(), coord);
            prop_assert_eq!(decoded, key);
        }

        #[test]
        fn prop_encode_is_injective(a in valid_coord(), b in valid_coord()) {
            prop_assert_eq!(a == b, a.key().as_str() == b.key().as_str());
        }
    }
}
