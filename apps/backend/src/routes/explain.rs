//! Explanation endpoint

use axum::{extract::State, Json};

use crate::error::{ApiError, Result};
use crate::models::{ExplainRequest, ExplainResponse};
use crate::services::ClientError;
use crate::AppState;

/// POST /api/explain
/// Generates a short Russian explanation for a script and its gloss
pub async fn explain(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<ExplainResponse>> {
    let api_key = state
        .explanation_key(request.api_key.as_deref())
        .ok_or(ClientError::MissingApiKey("Gemini"))?;

    if request.script.trim().is_empty() {
        return Err(ApiError::BadRequest("No script provided".to_string()));
    }

    let explanation = state
        .explainer
        .explain(api_key, request.script.trim(), request.gloss.trim())
        .await?;

    Ok(Json(ExplainResponse { explanation }))
}
