//! Lookup command - read one tile from the store.

use std::path::PathBuf;

use tilestash::cache::SharedTileStore;
use tilestash::coord::{tile_to_lat_lng, TileKey};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the lookup command.
pub struct LookupArgs {
    /// Tile key, `z/x/y`
    pub key: String,
    /// Where to write the tile, if anywhere
    pub output: Option<PathBuf>,
}

/// Run the lookup command.
pub async fn run(runner: &CliRunner, args: LookupArgs) -> Result<(), CliError> {
    runner.log_startup("lookup");

    let key = TileKey::parse(&args.key).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let store = SharedTileStore::new(runner.existing_store_config()?);

    let payload = store
        .get(&key)
        .await?
        .ok_or_else(|| CliError::TileNotFound(key.to_string()))?;

    let corner = tile_to_lat_lng(&key.coord());
    println!(
        "{}: north-west corner {:.5}, {:.5}",
        key, corner.lat, corner.lng
    );

    match args.output {
        Some(path) => {
            std::fs::write(&path, &payload).map_err(|error| CliError::FileWrite {
                path: path.display().to_string(),
                error,
            })?;
            println!("{}: {} bytes written to {}", key, payload.len(), path.display());
        }
        None => println!("{}: {} bytes", key, payload.len()),
    }

    Ok(())
}
