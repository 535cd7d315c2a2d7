//! Wedsite - marketing site and content admin for a wedding-planning business

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wedsite::{config::Config, web};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wedsite=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Wedsite...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!(backend = %config.backend.api_url(), "Configuration loaded");

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Build application state and router
    let state = web::AppState::new(config)?;
    if !state.cache.is_enabled() {
        tracing::info!("Public content cache disabled");
    }
    let app = web::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
