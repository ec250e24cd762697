//! Tile server access
//!
//! This module provides the HTTP client used by both the prefetcher and the
//! request interceptor, plus the URL template the prefetcher uses to address
//! individual tiles.
//!
//! ```ignore
//! use tilestash::provider::{AsyncHttpClient, ReqwestClient, TileUrlTemplate};
//!
//! let client = ReqwestClient::new()?;
//! let template = TileUrlTemplate::default();
//! let response = client.get(&template.url(&tile)).await?;
//! ```

mod http;
mod template;
mod types;

pub use http::{AsyncHttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use template::{
    TemplateError, TileUrlTemplate, DEFAULT_SUBDOMAIN, DEFAULT_TILE_URL,
};
pub use types::{HttpResponse, NetworkError};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
