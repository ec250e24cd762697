//! Prefetch command - download a region for offline use.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use tilestash::coord::BoundingBox;
use tilestash::prefetch::Prefetcher;
use tilestash::provider::{ReqwestClient, TileUrlTemplate};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the prefetch command.
pub struct PrefetchArgs {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
    pub zoom: u8,
    /// Overrides `[network] tile_url`
    pub tile_url: Option<String>,
}

/// Run the prefetch command.
pub async fn run(runner: &CliRunner, args: PrefetchArgs) -> Result<(), CliError> {
    runner.log_startup("prefetch");
    let network = &runner.config().network;

    let template = match args.tile_url {
        Some(url) => TileUrlTemplate::new(&url)
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?
            .with_subdomain(network.subdomain.clone()),
        None => network.template(),
    };

    let bbox = BoundingBox::from_edges(args.south, args.west, args.north, args.east);
    let range = Prefetcher::<ReqwestClient>::plan(&bbox, args.zoom)?;

    println!(
        "Prefetching {} tiles at zoom {} from {}",
        range.len(),
        args.zoom,
        template
    );
    info!(tiles = range.len(), zoom = args.zoom, url = %template, "Prefetch requested");

    let prefetcher = Prefetcher::new(runner.http_client()?, runner.shared_store(), template);

    let bar = ProgressBar::new(range.len());
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos:>7}/{len:7} {msg} eta {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let summary = prefetcher
        .run_range(&range, |progress| {
            bar.set_position(progress.completed);
            bar.set_message(progress.tile.to_string());
        })
        .await?;

    bar.finish_and_clear();
    println!("Prefetch complete: {}", summary);
    if summary.failed > 0 {
        println!("Re-run the same command to retry the failed tiles.");
    }

    Ok(())
}
