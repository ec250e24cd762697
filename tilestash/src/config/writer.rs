//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[store]
; Directory holding the offline tile store
directory = {}

[network]
; Tile server URL used by `tilestash prefetch`. Must contain {{z}}, {{x}} and {{y}};
; {{s}} is replaced by the subdomain below.
tile_url = {}
subdomain = {}
; Request timeout in seconds
timeout = {}
; Public tile servers require an identifying User-Agent
user_agent = {}

[server]
; Address of the local tile proxy started by `tilestash serve`
listen = {}
; Tile server the proxy forwards cache misses to
upstream = {}

[logging]
directory = {}
"#,
        path_to_string(&config.store.directory),
        config.network.tile_url,
        config.network.subdomain,
        config.network.timeout,
        config.network.user_agent,
        config.server.listen,
        config.server.upstream,
        path_to_string(&config.logging.directory),
    )
}

/// Convert path to string, collapsing the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
