//! Client configuration endpoint

use axum::{extract::State, Json};

use crate::models::ConfigResponse;
use crate::AppState;

/// GET /api/config
/// Returns defaults for the client. API keys are never echoed back.
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let config = &state.config;
    Json(ConfigResponse {
        default_voice_id: config.default_voice_id.clone(),
        anki_connect_url: config.anki_connect_url.clone(),
        default_deck: config.default_deck.clone(),
        default_model: config.default_model.clone(),
        elevenlabs_configured: config.elevenlabs_api_key.is_some(),
        gemini_configured: config.gemini_api_key.is_some(),
    })
}
