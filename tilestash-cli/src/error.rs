//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use tilestash::cache::StoreError;
use tilestash::config::{config_file_path, ConfigFileError};
use tilestash::prefetch::PrefetchError;
use tilestash::provider::NetworkError;
use tilestash::server::ServerError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Invalid command-line argument
    InvalidArgument(String),
    /// Tile store could not be opened or used
    Store(StoreError),
    /// HTTP client could not be created
    Network(NetworkError),
    /// Prefetch refused
    Prefetch(PrefetchError),
    /// Tile proxy failed
    Server(ServerError),
    /// No tile store at the given directory
    StoreNotFound(String),
    /// Tile is not in the store
    TileNotFound(String),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Fix the value in {} and try again.", config_file_path().display());
            }
            CliError::Store(StoreError::VersionMismatch { .. }) => {
                eprintln!();
                eprintln!("The tile store was written by a newer version of tilestash.");
                eprintln!("Upgrade tilestash, or point --store-dir at a different directory.");
            }
            CliError::Prefetch(PrefetchError::NoTiles) => {
                eprintln!();
                eprintln!("Check that --south/--west/--north/--east are finite degrees.");
            }
            CliError::StoreNotFound(_) => {
                eprintln!();
                eprintln!("Check --store-dir, or run 'tilestash prefetch' to fill a new store.");
            }
            CliError::Server(ServerError::Bind { .. }) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. Another process is using the port: pick one with --listen");
                eprintln!("  2. Ports below 1024 need elevated privileges");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Store(e) => write!(f, "Tile store error: {}", e),
            CliError::Network(e) => write!(f, "Network error: {}", e),
            CliError::Prefetch(e) => write!(f, "Prefetch failed: {}", e),
            CliError::Server(e) => write!(f, "Tile proxy error: {}", e),
            CliError::StoreNotFound(dir) => write!(f, "No tile store at {}", dir),
            CliError::TileNotFound(key) => write!(f, "Tile {} is not in the store", key),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Store(e) => Some(e),
            CliError::Network(e) => Some(e),
            CliError::Prefetch(e) => Some(e),
            CliError::Server(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}

impl From<NetworkError> for CliError {
    fn from(e: NetworkError) -> Self {
        CliError::Network(e)
    }
}

impl From<PrefetchError> for CliError {
    fn from(e: PrefetchError) -> Self {
        CliError::Prefetch(e)
    }
}

impl From<ServerError> for CliError {
    fn from(e: ServerError) -> Self {
        CliError::Server(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            CliError::TileNotFound("5/10/12".to_string()).to_string(),
            "Tile 5/10/12 is not in the store"
        );
        assert_eq!(
            CliError::from(PrefetchError::NoTiles).to_string(),
            "Prefetch failed: No tiles to download"
        );
    }

    #[test]
    fn test_store_error_has_source() {
        let err = CliError::from(StoreError::Metadata("bad".to_string()));
        assert!(std::error::Error::source(&err).is_some());
    }
}
