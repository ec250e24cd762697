//! Request pipeline.
//!
//! An ordered list of predicate + handler pairs in front of the network
//! client. The first handler whose predicate accepts a request answers it;
//! requests no predicate accepts go straight to the network.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::Method;
use tracing::trace;

use crate::cache::{BoxFuture, TILE_CONTENT_TYPE};
use crate::provider::{AsyncHttpClient, HttpResponse, NetworkError};

/// An outgoing request seen by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRequest {
    pub method: Method,
    pub url: String,
}

impl TileRequest {
    /// A GET request for `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
        }
    }
}

/// Where a response body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// Served from the tile store.
    Store,
    /// Fetched from the network.
    Network,
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseSource::Store => write!(f, "store"),
            ResponseSource::Network => write!(f, "network"),
        }
    }
}

/// A response returned to the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub source: ResponseSource,
}

impl TileResponse {
    /// A `200 image/png` response synthesized from a stored payload.
    pub fn from_store(body: Bytes) -> Self {
        Self {
            status: 200,
            content_type: Some(TILE_CONTENT_TYPE.to_string()),
            body,
            source: ResponseSource::Store,
        }
    }

    /// A network response passed through unchanged.
    pub fn from_network(response: HttpResponse) -> Self {
        Self {
            status: response.status,
            content_type: response.content_type,
            body: response.body,
            source: ResponseSource::Network,
        }
    }
}

/// Answers requests accepted by its predicate.
pub trait RequestHandler: Send + Sync {
    fn handle<'a>(
        &'a self,
        request: &'a TileRequest,
    ) -> BoxFuture<'a, Result<TileResponse, NetworkError>>;
}

type Predicate = Box<dyn Fn(&TileRequest) -> bool + Send + Sync>;

struct Route {
    predicate: Predicate,
    handler: Arc<dyn RequestHandler>,
}

/// Dispatches requests to registered handlers or the network.
pub struct RequestPipeline<C> {
    client: Arc<C>,
    routes: Vec<Route>,
}

impl<C: AsyncHttpClient> RequestPipeline<C> {
    /// A pipeline with no handlers; everything passes through to `client`.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            routes: Vec::new(),
        }
    }

    /// Route requests accepted by `predicate` to `handler`.
    ///
    /// Routes are tried in registration order.
    pub fn register<P>(&mut self, predicate: P, handler: Arc<dyn RequestHandler>)
    where
        P: Fn(&TileRequest) -> bool + Send + Sync + 'static,
    {
        self.routes.push(Route {
            predicate: Box::new(predicate),
            handler,
        });
    }

    /// Answer `request`.
    pub async fn dispatch(&self, request: &TileRequest) -> Result<TileResponse, NetworkError> {
        if let Some(route) = self.routes.iter().find(|r| (r.predicate)(request)) {
            return route.handler.handle(request).await;
        }

        trace!(method = %request.method, url = %request.url, "Passing request through");
        self.passthrough(request).await
    }

    async fn passthrough(&self, request: &TileRequest) -> Result<TileResponse, NetworkError> {
        if request.method != Method::GET {
            return Err(NetworkError::UnsupportedMethod {
                method: request.method.to_string(),
                url: request.url.clone(),
            });
        }

        let response = self.client.get(&request.url).await?;
        Ok(TileResponse::from_network(response))
    }
}
