pub mod health;

use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tracing::info;

use crate::audit::handlers;
use crate::state::AppState;

/// Extracted text of a full bid bundle easily exceeds axum's 2 MB default.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// API routes, plus the pre-built UI bundle as fallback when `static_dir` exists.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/analyze", post(handlers::handle_analyze))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state);

    if static_dir.is_dir() {
        info!("Serving static files from {}", static_dir.display());
        router.fallback_service(ServeDir::new(static_dir))
    } else {
        router
    }
}
