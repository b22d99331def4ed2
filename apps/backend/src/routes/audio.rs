//! Audio generation endpoint

use axum::{extract::State, Json};
use base64::{engine::general_purpose, Engine as _};

use crate::error::{ApiError, Result};
use crate::models::{AudioGenerateRequest, AudioGenerateResponse};
use crate::services::ClientError;
use crate::AppState;

/// POST /api/audio/generate
/// Returns base64-encoded speech for the given text
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<AudioGenerateRequest>,
) -> Result<Json<AudioGenerateResponse>> {
    let api_key = state
        .speech_key(request.api_key.as_deref())
        .ok_or(ClientError::MissingApiKey("ElevenLabs"))?;

    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("No text provided".to_string()));
    }

    let voice_id = request
        .voice_id
        .as_deref()
        .unwrap_or(&state.config.default_voice_id);
    let audio = state
        .speech
        .synthesize(api_key, voice_id, request.text.trim())
        .await?;

    Ok(Json(AudioGenerateResponse {
        audio: general_purpose::STANDARD.encode(audio),
    }))
}
