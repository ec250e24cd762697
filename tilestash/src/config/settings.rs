//! Configuration settings and their defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::provider::{TileUrlTemplate, DEFAULT_SUBDOMAIN, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::server::DEFAULT_LISTEN;

/// Upstream tile server the proxy forwards to.
pub const DEFAULT_UPSTREAM: &str = "https://a.tile.openstreetmap.org";

/// Log file name inside the log directory.
pub const DEFAULT_LOG_FILE: &str = "tilestash.log";

/// Default store directory (~/.cache/tilestash).
pub fn default_store_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("tilestash")
}

/// Default log directory (~/.tilestash/logs).
pub fn default_log_directory() -> PathBuf {
    super::config_directory().join("logs")
}

/// Complete configuration file contents.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub store: StoreSettings,
    pub network: NetworkSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    /// Directory the tile store lives in.
    pub directory: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            directory: default_store_directory(),
        }
    }
}

/// `[network]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSettings {
    /// Template used by the prefetcher to address tiles.
    pub tile_url: TileUrlTemplate,
    /// Substituted for `{s}` in `tile_url`.
    pub subdomain: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    pub user_agent: String,
}

impl NetworkSettings {
    /// `tile_url` with the configured subdomain applied.
    pub fn template(&self) -> TileUrlTemplate {
        self.tile_url.clone().with_subdomain(self.subdomain.clone())
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            tile_url: TileUrlTemplate::default(),
            subdomain: DEFAULT_SUBDOMAIN.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub listen: SocketAddr,
    /// Base URL requests are forwarded to.
    pub upstream: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8088))),
            upstream: DEFAULT_UPSTREAM.to_string(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
        }
    }
}
