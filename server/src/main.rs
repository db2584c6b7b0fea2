// Habitual - personal habit and goal tracking service
// Entry point and server setup

use anyhow::Context;
use habitual::app::AppState;
use habitual::config::ServerConfig;
use habitual::routes;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "habitual=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Habitual");

    let config = ServerConfig::from_env().context("Invalid configuration")?;
    let addr = config.addr;

    let state = AppState::initialize(config)
        .await
        .context("Failed to initialize application")?;

    let scheduler = state
        .start_scheduler()
        .await
        .context("Failed to start scheduler")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, routes::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Err(e) = scheduler.shutdown().await {
        tracing::error!("Failed to stop scheduler: {}", e);
    }

    tracing::info!("Habitual stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
