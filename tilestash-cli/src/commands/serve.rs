//! Serve command - run the caching tile proxy.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use tilestash::intercept::{RequestPipeline, TileInterceptor};
use tilestash::server::{self, ProxyState};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the serve command.
pub struct ServeArgs {
    /// Overrides `[server] listen`
    pub listen: Option<SocketAddr>,
    /// Overrides `[server] upstream`
    pub upstream: Option<String>,
}

/// Run the serve command until Ctrl-C.
pub async fn run(runner: &CliRunner, args: ServeArgs) -> Result<(), CliError> {
    runner.log_startup("serve");
    let settings = &runner.config().server;

    let listen = args.listen.unwrap_or(settings.listen);
    let upstream = args.upstream.unwrap_or_else(|| settings.upstream.clone());
    if !(upstream.starts_with("http://") || upstream.starts_with("https://")) {
        return Err(CliError::InvalidArgument(format!(
            "upstream must be an http:// or https:// URL, got '{}'",
            upstream
        )));
    }

    let client = runner.http_client()?;
    let interceptor = Arc::new(TileInterceptor::new(
        Arc::clone(&client),
        runner.shared_store(),
    ));
    let mut pipeline = RequestPipeline::new(client);
    interceptor.install(&mut pipeline);

    let listener = server::bind(listen).await?;
    println!("Serving tiles on http://{} (upstream {})", listen, upstream);
    println!("Point your map's tile URL at http://{}/{{z}}/{{x}}/{{y}}.png", listen);
    println!("Press Ctrl-C to stop.");

    let state = Arc::new(ProxyState::new(&upstream, pipeline));
    server::serve(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;

    info!(pending = interceptor.pending_writes(), "Flushing tile writes");
    interceptor.wait_for_pending_writes().await;
    println!("Stopped.");
    Ok(())
}
