use anyhow::Context;
use tracing_subscriber::EnvFilter;

use landing_api::config;
use landing_api::database::models::{Client, Project, Resource};
use landing_api::services::AccountService;
use landing_api::state::AppState;
use landing_api::{database, is_production, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("landing_api=info,tower_http=info")),
        )
        .init();

    let config = config::config().clone();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting landing API in {:?} mode", config.environment);

    if !is_production!() {
        tracing::warn!("Non-production profile: default JWT secret and admin credentials may be in use");
    }

    let repos = database::connect(&config.database)
        .await
        .context("failed to open the data store")?;
    tracing::info!("Using {} store", repos.backend_name());

    let state = AppState::new(config, repos);
    state
        .uploads
        .ensure_dirs(&[Project::COLLECTION, Client::COLLECTION])
        .await
        .with_context(|| format!("failed to create {}", state.uploads.root().display()))?;

    AccountService::new(state.repos.users.clone())
        .seed_admin(&state.config.security)
        .await
        .context("failed to seed the admin account")?;

    let bind_addr = format!("0.0.0.0:{}", state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Landing API listening on http://{}", bind_addr);

    axum::serve(listener, routes::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
