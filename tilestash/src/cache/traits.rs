//! Core traits for the tile store.
//!
//! The `Cache` trait provides a domain-agnostic key-value interface. Both
//! store providers implement it, and the tile-specific [`TileStore`] wraps
//! whichever one is in use.
//!
//! # Design Principles
//!
//! - **String keys**: Human-readable for debugging; tile keys are `z/x/y`
//! - **Bytes values**: Raw payloads, no serialization opinions imposed
//! - **Minimal interface**: exact-key get and overwriting put, nothing else
//! - **Dyn-compatible**: Uses `Pin<Box<dyn Future>>` for trait object support
//!
//! [`TileStore`]: crate::cache::TileStore

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error while reading or writing the store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store metadata file could not be read or written.
    #[error("Invalid store metadata: {0}")]
    Metadata(String),

    /// The directory holds a different store.
    #[error("Store name mismatch: found '{found}', expected '{expected}'")]
    NameMismatch { found: String, expected: String },

    /// The store on disk was written by a newer schema.
    #[error("Store version {found} is newer than supported version {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    /// A blocking store task failed to complete.
    #[error("Store task failed: {0}")]
    Task(String),

    /// The backing storage refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Metadata(e.to_string())
    }
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Generic key-value store interface.
///
/// # Consistency
///
/// Each `set` is atomic for its key: a concurrent `get` observes either the
/// previous value or the new one, never a partial write. Concurrent writes to
/// the same key are last-write-wins. Nothing spans more than one key.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` for use across async tasks.
pub trait Cache: Send + Sync {
    /// Store a value with the given key, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot persist the value.
    fn set(&self, key: &str, value: Bytes) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Retrieve a value by exact key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(data))` if the key exists
    /// - `Ok(None)` if the key is not found
    /// - `Err(_)` if the backing storage fails
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Bytes>, StoreError>>;
}
