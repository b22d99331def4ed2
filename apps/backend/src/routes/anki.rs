//! AnkiConnect connectivity probe

use axum::{
    extract::{Query, State},
    Json,
};

use crate::models::{AnkiTestQuery, AnkiTestResponse};
use crate::services::ClientError;
use crate::AppState;

/// GET /api/anki/test
/// Always answers 200; connection problems are reported in the body
pub async fn test_connection(
    State(state): State<AppState>,
    Query(query): Query<AnkiTestQuery>,
) -> Json<AnkiTestResponse> {
    let url = query
        .url
        .unwrap_or_else(|| state.config.anki_connect_url.clone());

    match state.notes.version(&url).await {
        Ok(version) => Json(AnkiTestResponse {
            connected: true,
            version: Some(version),
            error: None,
        }),
        Err(e) => {
            tracing::warn!("AnkiConnect probe failed for {}: {}", url, e);
            let error = match &e {
                ClientError::Http(http) if http.is_connect() || http.is_timeout() => {
                    "Cannot connect to AnkiConnect. Is Anki running?".to_string()
                }
                _ => e.to_string(),
            };
            Json(AnkiTestResponse {
                connected: false,
                version: None,
                error: Some(error),
            })
        }
    }
}
