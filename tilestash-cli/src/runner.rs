//! CLI runner for common setup.
//!
//! Loads the configuration, initializes logging and builds the shared pieces
//! (HTTP client, tile store) the commands work with.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use tilestash::cache::{SharedTileStore, StoreConfig};
use tilestash::config::{ConfigFile, DEFAULT_LOG_FILE};
use tilestash::logging::{init_logging, LoggingGuard};
use tilestash::provider::ReqwestClient;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps logging active while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Load config and initialize logging.
    ///
    /// # Arguments
    ///
    /// * `store_dir` - Overrides the configured store directory
    /// * `verbose` - Log at debug level when RUST_LOG is unset
    pub fn new(store_dir: Option<PathBuf>, verbose: bool) -> Result<Self, CliError> {
        let mut config = ConfigFile::load()?;
        if let Some(dir) = store_dir {
            config.store.directory = dir;
        }

        let level = if verbose { "debug" } else { "info" };
        let logging_guard = init_logging(&config.logging.directory, DEFAULT_LOG_FILE, level)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("TileStash v{}", tilestash::VERSION);
        info!(
            store = %self.config.store.directory.display(),
            "TileStash CLI: {} command", command
        );
    }

    /// Store settings for the configured directory.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.config.store.directory.clone())
    }

    /// Store settings for a store that must already exist.
    ///
    /// Read-only commands use this so a mistyped `--store-dir` is reported
    /// instead of leaving an empty store behind.
    pub fn existing_store_config(&self) -> Result<StoreConfig, CliError> {
        require_existing(self.store_config())
    }

    /// The process-wide tile store, opened on first use.
    pub fn shared_store(&self) -> Arc<SharedTileStore> {
        Arc::new(SharedTileStore::new(self.store_config()))
    }

    /// HTTP client with the configured timeout and User-Agent.
    pub fn http_client(&self) -> Result<Arc<ReqwestClient>, CliError> {
        let network = &self.config.network;
        let client = ReqwestClient::with_options(network.timeout, &network.user_agent)?;
        Ok(Arc::new(client))
    }
}

fn require_existing(config: StoreConfig) -> Result<StoreConfig, CliError> {
    let store_dir = config.store_dir();
    if store_dir.is_dir() {
        Ok(config)
    } else {
        Err(CliError::StoreNotFound(store_dir.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_store_is_reported_and_not_created() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig::new(temp.path().join("typo"));

        let result = require_existing(config.clone());

        assert!(matches!(result, Err(CliError::StoreNotFound(_))));
        assert!(!temp.path().join("typo").exists());
    }

    #[test]
    fn test_existing_store_is_accepted() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig::new(temp.path());
        std::fs::create_dir_all(config.store_dir()).unwrap();

        assert!(require_existing(config).is_ok());
    }
}
