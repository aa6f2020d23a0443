//! SpendView - expense dashboard server
//!
//! Main entry point for the HTTP application.

use std::sync::Arc;

use anyhow::Context;
use spendview_api::utils::logging::init_tracing;
use spendview_api::{router, AppContext};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    let dotenv = dotenvy::dotenv();

    init_tracing();

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => warn!(error = %err, "could not load .env file"),
    }

    let config = spendview_infra::config::load().context("failed to load configuration")?;
    let bind_addr = config.server.bind_addr.clone();
    let ctx = Arc::new(AppContext::from_config(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    let local = listener.local_addr().context("listener has no local address")?;
    info!(addr = %local, environment = %ctx.environment, "SpendView listening");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("SpendView stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}
