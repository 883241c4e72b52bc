//! Credential-Rotating Dispatcher — runs one generation request against the key pool.
//!
//! Flow per dispatch cycle:
//! 1. empty pool → `DispatchError::Configuration`, no call made
//! 2. order the pool with the injected `OrderingPolicy`
//! 3. one attempt per credential, sequentially, each bounded by `attempt_timeout`
//! 4. first payload that parses as an `AuditReport` wins; later keys are not tried
//! 5. nothing parsed → `DispatchError::AllCredentialsExhausted` with the last attempt error
//!
//! No backoff, no circuit breaking, no memory of failed keys between requests.

pub mod credentials;
pub mod ordering;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::audit::request::GenerationRequest;
use crate::llm_client::{strip_json_fences, GenerationBackend, LlmError};
use crate::models::report::AuditReport;

pub use credentials::{Credential, CredentialPool};
pub use ordering::{OrderingKind, OrderingPolicy};

/// Default per-attempt deadline. A hung call fails the attempt and rotation continues.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(120);

/// Why a single credential attempt failed. Recovered by rotation, never surfaced alone.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Backend(#[from] LlmError),

    #[error("attempt timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("AI returned an empty response")]
    EmptyPayload,

    #[error("AI response does not match the audit schema: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no credentials configured")]
    Configuration,

    #[error("all {attempts} credentials failed; last error: {last_error}")]
    AllCredentialsExhausted {
        attempts: usize,
        last_error: AttemptError,
    },
}

/// Owns the rotation policy. The pool is passed per call so callers and tests choose it.
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn GenerationBackend>,
    ordering: Arc<dyn OrderingPolicy>,
    attempt_timeout: Duration,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn GenerationBackend>, ordering: Arc<dyn OrderingPolicy>) -> Self {
        Self {
            backend,
            ordering,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    pub fn ordering_name(&self) -> &'static str {
        self.ordering.name()
    }

    /// Runs one dispatch cycle. Returns the first report that parses, or the terminal failure.
    pub async fn dispatch(
        &self,
        request: GenerationRequest,
        pool: &CredentialPool,
    ) -> Result<AuditReport, DispatchError> {
        if pool.is_empty() {
            return Err(DispatchError::Configuration);
        }

        let rotation = self.ordering.order(pool);
        let mut last_error: Option<AttemptError> = None;

        for (attempt, credential) in rotation.iter().enumerate() {
            match self.attempt(&request, credential).await {
                Ok(report) => {
                    info!(
                        "Audit generated with key {} (attempt {}/{})",
                        credential,
                        attempt + 1,
                        rotation.len()
                    );
                    return Ok(report);
                }
                Err(e) => {
                    warn!("Error with key {credential}: {e}");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(last_error) => Err(DispatchError::AllCredentialsExhausted {
                attempts: rotation.len(),
                last_error,
            }),
            // The ordering policy returned nothing for a non-empty pool.
            None => Err(DispatchError::Configuration),
        }
    }

    async fn attempt(
        &self,
        request: &GenerationRequest,
        credential: &Credential,
    ) -> Result<AuditReport, AttemptError> {
        let call = self
            .backend
            .generate(credential.secret(), &request.prompt, request.schema);

        let payload = tokio::time::timeout(self.attempt_timeout, call)
            .await
            .map_err(|_| AttemptError::Timeout(self.attempt_timeout))??;

        let payload = strip_json_fences(&payload);
        if payload.is_empty() {
            return Err(AttemptError::EmptyPayload);
        }

        debug!("Parsing {} byte payload from key {}", payload.len(), credential);
        Ok(serde_json::from_str(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::ordering::{RandomOrder, SequentialOrder};
    use super::*;
    use crate::audit::request::build;
    use crate::models::report::fixtures::sample_report_json;

    /// What a scripted key does when called.
    #[derive(Clone)]
    enum Script {
        Succeed,
        AuthError,
        Empty,
        Malformed,
        Hang,
    }

    /// In-memory backend that replays a script per API key and records every call.
    struct ScriptedBackend {
        scripts: HashMap<String, Script>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(scripts: &[(&str, Script)]) -> Arc<Self> {
            Arc::new(Self {
                scripts: scripts
                    .iter()
                    .map(|(key, script)| (key.to_string(), script.clone()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn generate(
            &self,
            api_key: &str,
            _prompt: &str,
            _schema: &Value,
        ) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push(api_key.to_string());
            match self.scripts.get(api_key).cloned().unwrap_or(Script::AuthError) {
                Script::Succeed => Ok(sample_report_json().to_string()),
                Script::AuthError => Err(LlmError::Api {
                    status: 400,
                    message: format!("API key not valid: {api_key}"),
                }),
                Script::Empty => Ok(String::new()),
                Script::Malformed => Ok(r#"{"metadata": "not an object"}"#.to_string()),
                Script::Hang => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }
    }

    fn pool(keys: &[&str]) -> CredentialPool {
        CredentialPool::new(keys.iter().map(|k| Credential::new(*k)).collect())
    }

    fn sequential(backend: Arc<ScriptedBackend>) -> Dispatcher {
        Dispatcher::new(backend, Arc::new(SequentialOrder))
    }

    fn request() -> GenerationRequest {
        build("Edital.pdf", "texto do edital")
    }

    #[tokio::test]
    async fn test_first_success_makes_one_call() {
        let backend = ScriptedBackend::new(&[("k1", Script::Succeed), ("k2", Script::Succeed)]);
        let dispatcher = sequential(backend.clone());

        let report = dispatcher
            .dispatch(request(), &pool(&["k1", "k2"]))
            .await
            .unwrap();

        assert_eq!(report.metadata.filename, "Edital.pdf");
        assert_eq!(backend.calls(), ["k1"]);
    }

    #[tokio::test]
    async fn test_first_success_makes_one_call_under_random_order() {
        let backend = ScriptedBackend::new(&[
            ("k1", Script::Succeed),
            ("k2", Script::Succeed),
            ("k3", Script::Succeed),
        ]);
        let dispatcher = Dispatcher::new(backend.clone(), Arc::new(RandomOrder));

        dispatcher
            .dispatch(request(), &pool(&["k1", "k2", "k3"]))
            .await
            .unwrap();

        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_keys_are_skipped_until_success() {
        let backend = ScriptedBackend::new(&[
            ("k1", Script::AuthError),
            ("k2", Script::Empty),
            ("k3", Script::Malformed),
            ("k4", Script::Succeed),
            ("k5", Script::Succeed),
        ]);
        let dispatcher = sequential(backend.clone());

        let result = dispatcher
            .dispatch(request(), &pool(&["k1", "k2", "k3", "k4", "k5"]))
            .await;

        assert!(result.is_ok());
        assert_eq!(backend.calls(), ["k1", "k2", "k3", "k4"]);
    }

    #[tokio::test]
    async fn test_single_success_found_regardless_of_shuffle() {
        for _ in 0..20 {
            let backend = ScriptedBackend::new(&[
                ("k1", Script::AuthError),
                ("k2", Script::AuthError),
                ("k3", Script::Succeed),
                ("k4", Script::AuthError),
            ]);
            let dispatcher = Dispatcher::new(backend.clone(), Arc::new(RandomOrder));

            let result = dispatcher
                .dispatch(request(), &pool(&["k1", "k2", "k3", "k4"]))
                .await;

            assert!(result.is_ok());
            let calls = backend.calls();
            assert_eq!(calls.last().map(String::as_str), Some("k3"));
            let unique: std::collections::HashSet<&String> = calls.iter().collect();
            assert_eq!(unique.len(), calls.len(), "a key was tried twice");
        }
    }

    #[tokio::test]
    async fn test_all_failing_keys_exhaust_with_last_error() {
        let backend = ScriptedBackend::new(&[
            ("k1", Script::Empty),
            ("k2", Script::Malformed),
            ("k3", Script::AuthError),
        ]);
        let dispatcher = sequential(backend.clone());

        let err = dispatcher
            .dispatch(request(), &pool(&["k1", "k2", "k3"]))
            .await
            .unwrap_err();

        assert_eq!(backend.calls().len(), 3);
        match err {
            DispatchError::AllCredentialsExhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(matches!(
                    last_error,
                    AttemptError::Backend(LlmError::Api { status: 400, .. })
                ));
                assert!(last_error.to_string().contains("API key not valid: k3"));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_pool_fails_without_calls() {
        let backend = ScriptedBackend::new(&[]);
        let dispatcher = sequential(backend.clone());

        let err = dispatcher
            .dispatch(request(), &pool(&[]))
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Configuration));
        assert_eq!(err.to_string(), "no credentials configured");
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_auth_error_then_valid_key() {
        let backend = ScriptedBackend::new(&[("k1", Script::AuthError), ("k2", Script::Succeed)]);
        let dispatcher = sequential(backend.clone());

        let report = dispatcher
            .dispatch(request(), &pool(&["k1", "k2"]))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            sample_report_json()
        );
        assert_eq!(backend.calls(), ["k1", "k2"]);
    }

    #[tokio::test]
    async fn test_single_key_with_empty_payload_exhausts() {
        let backend = ScriptedBackend::new(&[("k1", Script::Empty)]);
        let dispatcher = sequential(backend.clone());

        let err = dispatcher
            .dispatch(request(), &pool(&["k1"]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::AllCredentialsExhausted {
                attempts: 1,
                last_error: AttemptError::EmptyPayload,
            }
        ));
        assert_eq!(backend.calls(), ["k1"]);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_a_transient_failure() {
        let backend = ScriptedBackend::new(&[("k1", Script::Malformed)]);
        let dispatcher = sequential(backend);

        let err = dispatcher
            .dispatch(request(), &pool(&["k1"]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::AllCredentialsExhausted {
                last_error: AttemptError::MalformedPayload(_),
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_key_times_out_and_rotation_continues() {
        let backend = ScriptedBackend::new(&[("k1", Script::Hang), ("k2", Script::Succeed)]);
        let dispatcher = sequential(backend.clone()).with_attempt_timeout(Duration::from_secs(5));

        let result = dispatcher
            .dispatch(request(), &pool(&["k1", "k2"]))
            .await;

        assert!(result.is_ok());
        assert_eq!(backend.calls(), ["k1", "k2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_reported_as_last_error() {
        let backend = ScriptedBackend::new(&[("k1", Script::Hang)]);
        let dispatcher = sequential(backend).with_attempt_timeout(Duration::from_secs(5));

        let err = dispatcher
            .dispatch(request(), &pool(&["k1"]))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "all 1 credentials failed; last error: attempt timed out after 5s"
        );
    }

    /// Fenced payloads are accepted: some models wrap JSON in markdown despite the mime type.
    #[tokio::test]
    async fn test_fenced_payload_parses() {
        struct FencedBackend;

        #[async_trait]
        impl GenerationBackend for FencedBackend {
            async fn generate(&self, _: &str, _: &str, _: &Value) -> Result<String, LlmError> {
                Ok(format!("```json\n{}\n```", sample_report_json()))
            }
        }

        let dispatcher = Dispatcher::new(Arc::new(FencedBackend), Arc::new(SequentialOrder));
        assert!(dispatcher
            .dispatch(request(), &pool(&["k1"]))
            .await
            .is_ok());
    }
}
