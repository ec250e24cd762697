//! TileStash CLI - Command-line interface
//!
//! Prefetches map regions into the offline tile store and runs a local tile
//! proxy that serves from it.

mod commands;
mod error;
mod runner;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::lookup::LookupArgs;
use commands::prefetch::PrefetchArgs;
use commands::serve::ServeArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "tilestash")]
#[command(version)]
#[command(about = "Offline map tile cache", long_about = None)]
struct Cli {
    /// Tile store directory (overrides [store] directory)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write ~/.tilestash/config.ini with defaults
    Init,

    /// Download every tile covering a bounding box at one zoom level
    Prefetch {
        /// Southern edge latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        south: f64,

        /// Western edge longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        west: f64,

        /// Northern edge latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        north: f64,

        /// Eastern edge longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        east: f64,

        /// Zoom level (0-30)
        #[arg(long)]
        zoom: u8,

        /// Tile URL template with {z}, {x}, {y} and optional {s}
        #[arg(long)]
        tile_url: Option<String>,
    },

    /// Run the caching tile proxy
    Serve {
        /// Listen address (overrides [server] listen)
        #[arg(long)]
        listen: Option<SocketAddr>,

        /// Tile server to forward misses to (overrides [server] upstream)
        #[arg(long)]
        upstream: Option<String>,
    },

    /// Read one tile from the store
    Lookup {
        /// Tile key, e.g. 5/10/12
        key: String,

        /// Write the tile to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show tile store statistics
    Stats,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Commands::Init = cli.command {
        return commands::init::run();
    }

    let runner = CliRunner::new(cli.store_dir, cli.verbose)?;

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Prefetch {
            south,
            west,
            north,
            east,
            zoom,
            tile_url,
        } => {
            commands::prefetch::run(
                &runner,
                PrefetchArgs {
                    south,
                    west,
                    north,
                    east,
                    zoom,
                    tile_url,
                },
            )
            .await
        }
        Commands::Serve { listen, upstream } => {
            commands::serve::run(&runner, ServeArgs { listen, upstream }).await
        }
        Commands::Lookup { key, output } => {
            commands::lookup::run(&runner, LookupArgs { key, output }).await
        }
        Commands::Stats => commands::stats::run(&runner).await,
    }
}
