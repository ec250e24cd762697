//! User configuration.
//!
//! Settings are read from `~/.tilestash/config.ini`. A missing file, section
//! or key falls back to the defaults in [`settings`].

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use parser::expand_tilde;
pub use settings::{
    default_log_directory, default_store_directory, ConfigFile, LoggingSettings, NetworkSettings,
    ServerSettings, StoreSettings, DEFAULT_LOG_FILE, DEFAULT_UPSTREAM,
};
