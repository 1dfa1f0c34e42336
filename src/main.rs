use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cricket_live::config::Config;
use cricket_live::server::create_router;
use cricket_live::service::LiveScoreService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cricket_live=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cricket-live");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Initialize API clients
    let service = Arc::new(LiveScoreService::from_config(&config)?);
    info!("API clients initialized");

    let app = create_router(service);

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await
        .context("HTTP server failed")?;

    info!("Shutting down cricket-live");
    Ok(())
}
