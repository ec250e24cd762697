//! Init command - write the configuration file.

use std::path::Path;

use tilestash::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command.
///
/// Keeps existing settings and fills in anything missing with defaults.
pub fn run() -> Result<(), CliError> {
    let path = config_file_path();
    let config = write_config(&path)?;

    println!("Configuration file: {}", path.display());
    println!("Tile store:         {}", config.store.directory.display());
    println!();
    println!("Edit this file to change the tile server, proxy address or store location.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}

/// Rewrite the config file at `path` with every setting present.
///
/// An existing file that fails to parse is left untouched.
fn write_config(path: &Path) -> Result<ConfigFile, CliError> {
    let config = ConfigFile::load_from(path)?;
    config.save_to(path)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        write_config(&path).unwrap();

        assert!(path.exists());
        assert!(ConfigFile::load_from(&path).is_ok());
    }

    #[test]
    fn test_keeps_existing_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(&path, "[store]\ndirectory = /srv/tiles\n").unwrap();

        let config = write_config(&path).unwrap();

        assert_eq!(config.store.directory, Path::new("/srv/tiles"));
        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded.store.directory, Path::new("/srv/tiles"));
    }

    #[test]
    fn test_invalid_file_is_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        let original = "[store]\ndirectory = /srv/tiles\n\n[network]\ntimeout = 0\n";
        fs::write(&path, original).unwrap();

        let result = write_config(&path);

        assert!(matches!(result, Err(CliError::Config(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }
}
