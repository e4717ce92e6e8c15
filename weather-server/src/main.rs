//! Binary for the weather proxy server.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use weather_core::{Config, provider::provider_from_config};
use weather_server::{AppState, router};

#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather proxy API")]
struct Args {
    /// Path to a config file instead of the platform default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8000.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let provider = provider_from_config(&config.provider)?;
    let app = router(AppState::new(Arc::from(provider)));

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;

    tracing::info!(
        bind = %config.server.bind,
        upstream = %config.provider.base_url,
        timeout_secs = config.provider.timeout_secs,
        "weather proxy listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
