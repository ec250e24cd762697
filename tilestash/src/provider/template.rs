//! Tile URL templates.
//!
//! Templates use the placeholder syntax of common web map libraries:
//! `https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::coord::TileCoord;

/// The public OpenStreetMap raster tile server.
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Subdomain substituted for `{s}` when none is configured.
pub const DEFAULT_SUBDOMAIN: &str = "a";

/// Invalid tile URL template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid tile URL template '{template}': missing {placeholder}")]
pub struct TemplateError {
    pub template: String,
    pub placeholder: &'static str,
}

/// A URL template with `{z}`, `{x}`, `{y}` and optional `{s}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileUrlTemplate {
    template: String,
    subdomain: String,
}

impl TileUrlTemplate {
    /// Parse a template, requiring the three coordinate placeholders.
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !template.contains(placeholder) {
                return Err(TemplateError {
                    template: template.to_string(),
                    placeholder,
                });
            }
        }

        Ok(Self {
            template: template.to_string(),
            subdomain: DEFAULT_SUBDOMAIN.to_string(),
        })
    }

    /// Use `subdomain` for the `{s}` placeholder.
    pub fn with_subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = subdomain.into();
        self
    }

    /// The URL of one tile.
    pub fn url(&self, tile: &TileCoord) -> String {
        self.template
            .replace("{s}", &self.subdomain)
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for TileUrlTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TILE_URL.to_string(),
            subdomain: DEFAULT_SUBDOMAIN.to_string(),
        }
    }
}

impl FromStr for TileUrlTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for TileUrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_url() {
        let template = TileUrlTemplate::default();
        let tile = TileCoord::new(5, 10, 12).unwrap();

        assert_eq!(
            template.url(&tile),
            "https://a.tile.openstreetmap.org/5/10/12.png"
        );
    }

    #[test]
    fn test_custom_subdomain() {
        let template = TileUrlTemplate::default().with_subdomain("c");
        let tile = TileCoord::new(0, 0, 0).unwrap();

        assert_eq!(template.url(&tile), "https://c.tile.openstreetmap.org/0/0/0.png");
    }

    #[test]
    fn test_template_without_subdomain() {
        let template: TileUrlTemplate = "http://localhost:8088/tiles/{z}/{x}/{y}.png"
            .parse()
            .unwrap();
        let tile = TileCoord::new(3, 1, 2).unwrap();

        assert_eq!(template.url(&tile), "http://localhost:8088/tiles/3/1/2.png");
    }

    #[test]
    fn test_missing_placeholder_rejected() {
        let err = TileUrlTemplate::new("https://tiles.example/{z}/{x}.png").unwrap_err();
        assert_eq!(err.placeholder, "{y}");
    }
}
