//! Stats command - show tile store statistics.

use tilestash::cache::DiskCacheProvider;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the stats command.
pub async fn run(runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("stats");

    let store_config = runner.existing_store_config()?;
    let provider = DiskCacheProvider::open(&store_config).await?;
    let stats = provider.stats().await?;

    println!("Tile store: {}", store_config.store_dir().display());
    println!("  Version: {}", store_config.version);
    println!("  Tiles:   {}", stats.records);
    println!("  Size:    {}", format_bytes(stats.bytes));
    Ok(())
}

/// Format a byte count with a binary unit.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
