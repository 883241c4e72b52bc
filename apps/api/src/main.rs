mod audit;
mod config;
mod dispatch;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bid Auditor API v{}", env!("CARGO_PKG_VERSION"));

    if config.credentials.is_empty() {
        warn!("No API keys found in API_KEY; every analyze request will fail");
    }

    // Initialize Gemini client (one HTTP client shared by every key)
    let gemini = GeminiClient::new(config.gemini_api_base.clone())?;
    info!("Gemini client initialized (model: {})", llm_client::MODEL);

    let dispatcher = Dispatcher::new(Arc::new(gemini), config.credential_order.policy())
        .with_attempt_timeout(config.attempt_timeout);
    info!(
        "Dispatcher ready: {} API key(s), {} order, {}s per attempt",
        config.credentials.len(),
        dispatcher.ordering_name(),
        config.attempt_timeout.as_secs()
    );

    // Build app state
    let state = AppState {
        dispatcher: Arc::new(dispatcher),
        credentials: config.credentials.clone(),
    };

    // Build router
    let app = build_router(state, &config.static_dir)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
