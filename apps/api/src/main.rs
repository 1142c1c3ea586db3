mod config;
mod dashboard;
mod errors;
mod hh_client;
mod llm_client;
mod models;
mod onboarding;
mod routes;
mod session;
mod state;
mod subscription;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::hh_client::HhClient;
use crate::llm_client::LlmClient;
use crate::onboarding::store::FileStateStore;
use crate::routes::build_router;
use crate::session::oauth::PendingStates;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting otclick API v{}", env!("CARGO_PKG_VERSION"));

    let hh = HhClient::new(config.hh.clone());
    info!("HeadHunter client initialized ({})", config.hh.api_base);

    let llm = LlmClient::new(config.gigachat.clone());
    info!("GigaChat client initialized (model: {})", llm.model());

    let client_state = Arc::new(FileStateStore::new(config.client_state_path.clone()));
    info!(
        "Client state stored in {}",
        config.client_state_path.display()
    );

    // Expired sessions and unredeemed OAuth states are swept periodically
    let sessions = Arc::new(SessionStore::new());
    sessions.spawn_cleanup_task();
    let pending = Arc::new(PendingStates::new());
    pending.spawn_cleanup_task();

    let state = AppState {
        config: config.clone(),
        hh,
        llm,
        sessions,
        pending,
        client_state,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the frontend host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
