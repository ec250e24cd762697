//! Cache-first tile interception.
//!
//! For each tile request:
//!
//! ```text
//! lookup ──hit──► 200 image/png from store
//!    │
//!  miss / store error
//!    │
//!    ▼
//! fetch ──error──► propagate, nothing stored
//!    │
//!   ok ──► respond now, store in background
//! ```
//!
//! Background writes never delay or fail the response. They are tracked so a
//! host can wait for them before shutting down.

use std::sync::Arc;

use reqwest::Method;
use tokio::sync::Mutex;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use super::pattern::tile_key_for;
use super::pipeline::{RequestHandler, RequestPipeline, TileRequest, TileResponse};
use crate::cache::{BoxFuture, SharedTileStore};
use crate::coord::TileKey;
use crate::provider::{AsyncHttpClient, HttpResponse, NetworkError};

/// Serves tile requests from the store, falling back to the network.
pub struct TileInterceptor<C> {
    client: Arc<C>,
    store: Arc<SharedTileStore>,
    writes: TaskTracker,
    // Serializes close/wait/reopen on `writes`
    drain: Mutex<()>,
}

impl<C: AsyncHttpClient + 'static> TileInterceptor<C> {
    pub fn new(client: Arc<C>, store: Arc<SharedTileStore>) -> Self {
        Self {
            client,
            store,
            writes: TaskTracker::new(),
            drain: Mutex::new(()),
        }
    }

    /// Register this interceptor for tile requests on `pipeline`.
    pub fn install(self: &Arc<Self>, pipeline: &mut RequestPipeline<C>) {
        pipeline.register(
            |request| tile_key_for(&request.method, &request.url).is_some(),
            Arc::clone(self) as Arc<dyn RequestHandler>,
        );
    }

    /// Answer a tile request.
    pub async fn intercept(&self, request: &TileRequest) -> Result<TileResponse, NetworkError> {
        let Some(key) = tile_key_for(&request.method, &request.url) else {
            if request.method != Method::GET {
                return Err(NetworkError::UnsupportedMethod {
                    method: request.method.to_string(),
                    url: request.url.clone(),
                });
            }
            let response = self.client.get(&request.url).await?;
            return Ok(TileResponse::from_network(response));
        };

        match self.store.get(&key).await {
            Ok(Some(payload)) => {
                debug!(key = %key, "Tile served from store");
                return Ok(TileResponse::from_store(payload));
            }
            Ok(None) => {
                debug!(key = %key, "Tile not in store");
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Tile store lookup failed, fetching from network");
            }
        }

        let response = self.client.get(&request.url).await?;
        self.store_in_background(key, &response);
        Ok(TileResponse::from_network(response))
    }

    fn store_in_background(&self, key: TileKey, response: &HttpResponse) {
        let store = Arc::clone(&self.store);
        let payload = response.body.clone();

        self.writes.spawn(async move {
            match store.put(&key, payload).await {
                Ok(()) => debug!(key = %key, "Tile stored"),
                Err(e) => warn!(key = %key, error = %e, "Background tile store failed"),
            }
        });
    }

    /// Number of background writes still running.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Wait until every background write started so far has finished.
    ///
    /// Concurrent callers take turns; new writes may still be spawned while
    /// one is waiting.
    pub async fn wait_for_pending_writes(&self) {
        let _drain = self.drain.lock().await;
        self.writes.close();
        self.writes.wait().await;
        self.writes.reopen();
    }
}

impl<C: AsyncHttpClient + 'static> RequestHandler for TileInterceptor<C> {
    fn handle<'a>(
        &'a self,
        request: &'a TileRequest,
    ) -> BoxFuture<'a, Result<TileResponse, NetworkError>> {
        Box::pin(self.intercept(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bytes::Bytes;

    use crate::cache::{Cache, StoreError, TileStore};
    use crate::coord::TileCoord;
    use crate::intercept::ResponseSource;
    use crate::provider::MockAsyncHttpClient;

    const TILE_URL: &str = "https://a.tile.test/5/10/12.png";

    fn key() -> TileKey {
        TileCoord::new(5, 10, 12).unwrap().key()
    }

    fn interceptor(
        client: MockAsyncHttpClient,
        store: TileStore,
    ) -> (TileInterceptor<MockAsyncHttpClient>, Arc<MockAsyncHttpClient>) {
        let client = Arc::new(client);
        let interceptor = TileInterceptor::new(
            Arc::clone(&client),
            Arc::new(SharedTileStore::from_store(store)),
        );
        (interceptor, client)
    }

    /// Store whose every operation fails.
    struct BrokenCache;

    impl Cache for BrokenCache {
        fn set(&self, _key: &str, _value: Bytes) -> BoxFuture<'_, Result<(), StoreError>> {
            Box::pin(async { Err(StoreError::Unavailable("disk full".to_string())) })
        }

        fn get(&self, _key: &str) -> BoxFuture<'_, Result<Option<Bytes>, StoreError>> {
            Box::pin(async { Err(StoreError::Unavailable("disk full".to_string())) })
        }
    }

    #[tokio::test]
    async fn test_hit_is_served_without_network() {
        let store = TileStore::in_memory();
        store.put(&key(), Bytes::from_static(b"cached")).await.unwrap();
        let (interceptor, client) = interceptor(MockAsyncHttpClient::new(), store);

        let response = interceptor.intercept(&TileRequest::get(TILE_URL)).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.content_type.as_deref(), Some("image/png"));
        assert_eq!(response.body, Bytes::from_static(b"cached"));
        assert_eq!(response.source, ResponseSource::Store);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_miss_fetches_once_and_stores() {
        let store = TileStore::in_memory();
        let (interceptor, client) = interceptor(
            MockAsyncHttpClient::new().with_tile(TILE_URL, b"fresh"),
            store.clone(),
        );

        let response = interceptor.intercept(&TileRequest::get(TILE_URL)).await.unwrap();
        assert_eq!(response.source, ResponseSource::Network);
        assert_eq!(response.body, Bytes::from_static(b"fresh"));

        interceptor.wait_for_pending_writes().await;

        assert_eq!(client.calls(), 1);
        assert_eq!(
            store.get(&key()).await.unwrap(),
            Some(Bytes::from_static(b"fresh"))
        );
    }

    #[tokio::test]
    async fn test_second_request_is_a_hit() {
        let (interceptor, client) = interceptor(
            MockAsyncHttpClient::new().with_tile(TILE_URL, b"fresh"),
            TileStore::in_memory(),
        );

        interceptor.intercept(&TileRequest::get(TILE_URL)).await.unwrap();
        interceptor.wait_for_pending_writes().await;
        let second = interceptor.intercept(&TileRequest::get(TILE_URL)).await.unwrap();

        assert_eq!(second.source, ResponseSource::Store);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_query_string_shares_key() {
        let store = TileStore::in_memory();
        store.put(&key(), Bytes::from_static(b"cached")).await.unwrap();
        let (interceptor, client) = interceptor(MockAsyncHttpClient::new(), store);

        let response = interceptor
            .intercept(&TileRequest::get("https://b.tile.test/5/10/12.png?token=abc"))
            .await
            .unwrap();

        assert_eq!(response.source, ResponseSource::Store);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_offline_miss_propagates_and_stores_nothing() {
        let store = TileStore::in_memory();
        let (interceptor, client) = interceptor(MockAsyncHttpClient::new(), store.clone());

        let result = interceptor.intercept(&TileRequest::get(TILE_URL)).await;
        interceptor.wait_for_pending_writes().await;

        assert!(matches!(result, Err(NetworkError::Transport { .. })));
        assert_eq!(client.calls(), 1);
        assert!(store.get(&key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_error_status_propagates_and_stores_nothing() {
        let store = TileStore::in_memory();
        let client = MockAsyncHttpClient::new().with_error(
            TILE_URL,
            NetworkError::Status {
                status: 404,
                url: TILE_URL.to_string(),
            },
        );
        let (interceptor, _) = interceptor(client, store.clone());

        let result = interceptor.intercept(&TileRequest::get(TILE_URL)).await;
        interceptor.wait_for_pending_writes().await;

        assert!(matches!(result, Err(NetworkError::Status { status: 404, .. })));
        assert!(store.get(&key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failing_store_falls_back_to_network() {
        let (interceptor, client) = interceptor(
            MockAsyncHttpClient::new().with_tile(TILE_URL, b"fresh"),
            TileStore::new(Arc::new(BrokenCache)),
        );

        let response = interceptor.intercept(&TileRequest::get(TILE_URL)).await.unwrap();
        interceptor.wait_for_pending_writes().await;

        assert_eq!(response.body, Bytes::from_static(b"fresh"));
        assert_eq!(client.calls(), 1);
        assert_eq!(interceptor.pending_writes(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_waiters_all_return() {
        let store = TileStore::in_memory();
        let (interceptor, _) = interceptor(
            MockAsyncHttpClient::new().with_tile(TILE_URL, b"fresh"),
            store.clone(),
        );
        interceptor.intercept(&TileRequest::get(TILE_URL)).await.unwrap();

        let waited = tokio::time::timeout(std::time::Duration::from_secs(5), async {
            tokio::join!(
                interceptor.wait_for_pending_writes(),
                interceptor.wait_for_pending_writes(),
                interceptor.wait_for_pending_writes(),
            )
        })
        .await;

        assert!(waited.is_ok());
        assert_eq!(interceptor.pending_writes(), 0);
        assert!(store.get(&key()).await.unwrap().is_some());
        assert!(!interceptor.writes.is_closed());
    }

    #[tokio::test]
    async fn test_installed_pipeline_passes_other_traffic() {
        let client = Arc::new(
            MockAsyncHttpClient::new()
                .with_tile(TILE_URL, b"tile")
                .with_tile("https://a.tile.test/copyright.html", b"html"),
        );
        let store = TileStore::in_memory();
        let interceptor = Arc::new(TileInterceptor::new(
            Arc::clone(&client),
            Arc::new(SharedTileStore::from_store(store.clone())),
        ));
        let mut pipeline = RequestPipeline::new(Arc::clone(&client));
        interceptor.install(&mut pipeline);

        pipeline
            .dispatch(&TileRequest::get("https://a.tile.test/copyright.html"))
            .await
            .unwrap();
        pipeline.dispatch(&TileRequest::get(TILE_URL)).await.unwrap();
        interceptor.wait_for_pending_writes().await;

        assert_eq!(client.calls(), 2);
        assert!(store.get(&key()).await.unwrap().is_some());
    }
}
