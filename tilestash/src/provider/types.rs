//! Network types shared by the HTTP client and its callers.

use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur while fetching from the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The request never produced a response (offline, DNS, TLS, reset).
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be read.
    #[error("Failed to read response from {url}: {message}")]
    Body { url: String, message: String },

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// The client only issues GET requests.
    #[error("Unsupported method {method} for {url}")]
    UnsupportedMethod { method: String, url: String },
}

/// A successful network response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code (always 2xx).
    pub status: u16,
    /// `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// A `200 OK` response with the given content type.
    pub fn ok(content_type: impl Into<String>, body: Bytes) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.into()),
            body,
        }
    }
}
