//! Durable on-disk store provider.
//!
//! Stores each record as one file and keeps a small metadata file describing
//! the store's identity and schema version.
//!
//! # File Layout
//!
//! ```text
//! {directory}/{name}/store.json               name, version, collections
//! {directory}/{name}/tiles/{hh}/{hash}.bin    one record per key
//! ```
//!
//! `{hash}` is the SHA-256 of the key in lowercase hex and `{hh}` its first
//! two characters, which keeps directories small at high zoom levels.
//!
//! # Versioning
//!
//! Opening a store whose metadata is missing or older than the requested
//! version upgrades it in place: missing collections are created and the
//! metadata is rewritten. Existing records are left untouched. A store written
//! by a newer version is refused.
//!
//! # Atomicity
//!
//! Every write goes to a uniquely named temp file in the record's directory
//! and is renamed over the record. Readers see the old payload or the new one;
//! concurrent writers of one key leave whichever rename ran last.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::cache::config::{StoreConfig, SCHEMA_COLLECTIONS, TILES_COLLECTION};
use crate::cache::traits::{BoxFuture, Cache, StoreError};

/// Metadata file name inside the store directory.
const METADATA_FILE: &str = "store.json";

/// Extension of record files.
const RECORD_EXTENSION: &str = "bin";

/// Extension of in-progress writes.
const TEMP_EXTENSION: &str = "tmp";

/// Sequence for unique temp file names within this process.
static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Persisted description of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoreMetadata {
    name: String,
    version: u32,
    collections: Vec<String>,
}

/// Record count and total payload size of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub records: u64,
    pub bytes: u64,
}

/// Durable on-disk store provider for the tiles collection.
pub struct DiskCacheProvider {
    /// Directory of the tiles collection.
    collection_dir: PathBuf,
}

impl DiskCacheProvider {
    /// Open the store described by `config`, creating or upgrading it.
    ///
    /// Safe to call repeatedly and concurrently for the same directory: every
    /// step is either idempotent (directory creation) or an atomic replace of
    /// the metadata file with identical content.
    ///
    /// # Errors
    ///
    /// - `StoreError::Io` if the directories or metadata cannot be written
    /// - `StoreError::Metadata` if `store.json` exists but is not valid
    /// - `StoreError::NameMismatch` if the directory holds another store
    /// - `StoreError::VersionMismatch` if the store is newer than `config.version`
    pub async fn open(config: &StoreConfig) -> Result<Arc<Self>, StoreError> {
        let store_dir = config.store_dir();
        tokio::fs::create_dir_all(&store_dir).await?;

        let metadata_path = store_dir.join(METADATA_FILE);
        let existing = read_metadata(&metadata_path).await?;

        let found_version = match &existing {
            Some(meta) => {
                if meta.name != config.name {
                    return Err(StoreError::NameMismatch {
                        found: meta.name.clone(),
                        expected: config.name.clone(),
                    });
                }
                if meta.version > config.version {
                    return Err(StoreError::VersionMismatch {
                        found: meta.version,
                        expected: config.version,
                    });
                }
                meta.version
            }
            None => 0,
        };

        // Create-if-missing runs on every open so a removed collection
        // directory comes back empty instead of failing every write.
        for collection in SCHEMA_COLLECTIONS {
            tokio::fs::create_dir_all(store_dir.join(collection)).await?;
        }

        if found_version < config.version {
            let mut collections: Vec<String> = existing
                .map(|meta| meta.collections)
                .unwrap_or_default();
            for collection in SCHEMA_COLLECTIONS {
                if !collections.iter().any(|c| c == collection) {
                    collections.push(collection.to_string());
                }
            }

            let metadata = StoreMetadata {
                name: config.name.clone(),
                version: config.version,
                collections,
            };
            let json = serde_json::to_vec_pretty(&metadata)?;
            write_atomic(&metadata_path, &json).await?;

            info!(
                dir = %store_dir.display(),
                from_version = found_version,
                to_version = config.version,
                "Tile store upgraded"
            );
        }

        debug!(dir = %store_dir.display(), version = config.version, "Tile store opened");

        Ok(Arc::new(Self {
            collection_dir: store_dir.join(TILES_COLLECTION),
        }))
    }

    /// Count records and payload bytes.
    ///
    /// Walks the collection directory on a blocking thread. In-progress temp
    /// files are not counted.
    pub async fn stats(&self) -> Result<StoreStats, StoreError> {
        let dir = self.collection_dir.clone();
        tokio::task::spawn_blocking(move || collect_stats(&dir))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Get the file path for a key.
    fn record_path(&self, key: &str) -> PathBuf {
        let hash = format!("{:x}", Sha256::digest(key.as_bytes()));
        self.collection_dir
            .join(&hash[..2])
            .join(format!("{}.{}", hash, RECORD_EXTENSION))
    }
}

impl Cache for DiskCacheProvider {
    fn set(&self, key: &str, value: Bytes) -> BoxFuture<'_, Result<(), StoreError>> {
        let path = self.record_path(key);
        Box::pin(async move {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            write_atomic(&path, &value).await
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Bytes>, StoreError>> {
        let path = self.record_path(key);
        Box::pin(async move {
            match tokio::fs::read(&path).await {
                Ok(data) => Ok(Some(Bytes::from(data))),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(StoreError::Io(e)),
            }
        })
    }
}

/// Read `store.json`, `None` if it does not exist yet.
async fn read_metadata(path: &Path) -> Result<Option<StoreMetadata>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::Io(e)),
    }
}

/// Write `data` to a unique temp file beside `path`, then rename it over `path`.
async fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    let seq = TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let temp_path = path.with_extension(format!(
        "{}-{}.{}",
        std::process::id(),
        seq,
        TEMP_EXTENSION
    ));

    if let Err(e) = tokio::fs::write(&temp_path, data).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(StoreError::Io(e));
    }
    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(StoreError::Io(e));
    }
    Ok(())
}

/// Blocking walk of a collection directory.
fn collect_stats(dir: &Path) -> Result<StoreStats, StoreError> {
    let mut stats = StoreStats::default();

    for shard in std::fs::read_dir(dir)?.flatten() {
        let shard_path = shard.path();
        if !shard_path.is_dir() {
            continue;
        }
        for entry in std::fs::read_dir(&shard_path)?.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Ok(metadata) = entry.metadata() {
                stats.records += 1;
                stats.bytes += metadata.len();
            }
        }
    }

    Ok(stats)
}
