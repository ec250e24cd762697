//! Local tile proxy.
//!
//! Serves `GET /{path}` by forwarding to `{upstream}/{path}` through a
//! [`RequestPipeline`], so a map renderer pointed at the proxy gets tiles from
//! the store whenever they are there.
//!
//! Error mapping:
//! - upstream status errors keep their status
//! - transport and body failures become `502 Bad Gateway`

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::intercept::{RequestPipeline, TileRequest, TileResponse};
use crate::provider::{AsyncHttpClient, NetworkError};

/// Default proxy listen address.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8088";

/// Errors running the proxy.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] io::Error),
}

/// Shared state of the proxy.
pub struct ProxyState<C> {
    upstream: String,
    pipeline: RequestPipeline<C>,
}

impl<C: AsyncHttpClient + 'static> ProxyState<C> {
    /// Proxy to `upstream`, e.g. `https://a.tile.openstreetmap.org`.
    pub fn new(upstream: &str, pipeline: RequestPipeline<C>) -> Self {
        Self {
            upstream: upstream.trim_end_matches('/').to_string(),
            pipeline,
        }
    }

    /// The upstream URL for a request path and query.
    fn upstream_url(&self, uri: &Uri) -> String {
        let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
        format!("{}{}", self.upstream, path)
    }
}

/// Build the proxy router.
pub fn router<C: AsyncHttpClient + 'static>(state: Arc<ProxyState<C>>) -> Router {
    Router::new()
        .route("/*path", get(proxy::<C>))
        .with_state(state)
}

/// Bind `addr`.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Serve the proxy on `listener` until `shutdown` resolves.
pub async fn serve<C, F>(
    listener: TcpListener,
    state: Arc<ProxyState<C>>,
    shutdown: F,
) -> Result<(), ServerError>
where
    C: AsyncHttpClient + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(addr = %addr, upstream = %state.upstream, "Tile proxy listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Tile proxy stopped");
    Ok(())
}

async fn proxy<C: AsyncHttpClient + 'static>(
    State(state): State<Arc<ProxyState<C>>>,
    uri: Uri,
) -> Response {
    let request = TileRequest::get(state.upstream_url(&uri));

    match state.pipeline.dispatch(&request).await {
        Ok(response) => {
            debug!(url = %request.url, source = %response.source, "Proxied");
            into_response(response)
        }
        Err(e) => {
            warn!(url = %request.url, error = %e, "Proxy request failed");
            error_response(&e)
        }
    }
}

fn into_response(response: TileResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
    match response.content_type {
        Some(content_type) => {
            (status, [(header::CONTENT_TYPE, content_type)], response.body).into_response()
        }
        None => (status, response.body).into_response(),
    }
}

fn error_status(error: &NetworkError) -> StatusCode {
    match error {
        NetworkError::Status { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        NetworkError::Transport { .. } | NetworkError::Body { .. } => StatusCode::BAD_GATEWAY,
        NetworkError::UnsupportedMethod { .. } => StatusCode::METHOD_NOT_ALLOWED,
        NetworkError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: &NetworkError) -> Response {
    (error_status(error), error.to_string()).into_response()
}
