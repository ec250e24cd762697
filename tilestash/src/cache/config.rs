//! Store identity and location.

use std::path::PathBuf;

/// Name of the tile store.
///
/// Every writer opens the store by this name; changing it orphans all
/// previously cached tiles.
pub const STORE_NAME: &str = "tilestash-tiles";

/// Current schema version of the tile store.
pub const STORE_VERSION: u32 = 1;

/// The record collection holding tile payloads.
pub const TILES_COLLECTION: &str = "tiles";

/// Collections present at [`STORE_VERSION`].
pub(crate) const SCHEMA_COLLECTIONS: &[&str] = &[TILES_COLLECTION];

/// Content type of every stored payload.
pub const TILE_CONTENT_TYPE: &str = "image/png";

/// Where and under which identity the durable store lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root directory holding one subdirectory per store.
    pub directory: PathBuf,

    /// Store name (subdirectory of `directory`).
    pub name: String,

    /// Schema version the opener expects.
    pub version: u32,
}

impl StoreConfig {
    /// Create a config for the tile store under `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            name: STORE_NAME.to_string(),
            version: STORE_VERSION,
        }
    }

    /// Override the schema version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Directory of this store.
    pub fn store_dir(&self) -> PathBuf {
        self.directory.join(&self.name)
    }
}
