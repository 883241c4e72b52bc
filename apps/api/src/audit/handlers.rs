//! Axum route handler for the audit API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::audit::request::{build, MAX_DOCUMENT_CHARS};
use crate::errors::AppError;
use crate::models::report::AuditReport;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub filenames: String,
    pub text: String,
}

/// POST /analyze
///
/// Builds the audit request from already-extracted document text and runs it
/// through the key rotation. Returns the report as produced by the model.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AuditReport>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("analyze", %request_id);

    async move {
        let text_chars = request.text.chars().count();
        info!(
            "Analyzing [{}]: {} chars{}",
            request.filenames,
            text_chars,
            if text_chars > MAX_DOCUMENT_CHARS {
                " (truncated)"
            } else {
                ""
            }
        );

        let generation_request = build(&request.filenames, &request.text);
        let report = state
            .dispatcher
            .dispatch(generation_request, &state.credentials)
            .await?;

        Ok::<_, AppError>(Json(report))
    }
    .instrument(span)
    .await
}
