use std::sync::Arc;

use crate::dispatch::{CredentialPool, Dispatcher};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    /// Read-only key pool, loaded once at startup. Handed to the dispatcher per request.
    pub credentials: CredentialPool,
}
