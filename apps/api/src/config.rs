use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::dispatch::{CredentialPool, OrderingKind, DEFAULT_ATTEMPT_TIMEOUT};
use crate::llm_client::DEFAULT_API_BASE;

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed values; a missing `API_KEY` only fails analyze calls.
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed from the comma-separated `API_KEY`; read once, never reloaded.
    pub credentials: CredentialPool,
    pub credential_order: OrderingKind,
    pub attempt_timeout: Duration,
    pub gemini_api_base: String,
    pub static_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let attempt_timeout = match var("ATTEMPT_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .context("ATTEMPT_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => DEFAULT_ATTEMPT_TIMEOUT,
        };

        let credential_order = match var("CREDENTIAL_ORDER") {
            Some(raw) => raw
                .parse::<OrderingKind>()
                .map_err(anyhow::Error::msg)
                .context("CREDENTIAL_ORDER is invalid")?,
            None => OrderingKind::default(),
        };

        Ok(Config {
            credentials: CredentialPool::from_comma_separated(&var("API_KEY").unwrap_or_default()),
            credential_order,
            attempt_timeout,
            gemini_api_base: var("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            static_dir: PathBuf::from(var("STATIC_DIR").unwrap_or_else(|| "dist".to_string())),
            port: var("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .trim()
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
