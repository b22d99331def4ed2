//! Session storage and clients for the external services cards are
//! exported through.

pub mod anki;
pub mod explain;
pub mod session;
pub mod speech;

use std::time::Duration;

use thiserror::Error;

pub use anki::{AnkiConnectClient, NewNote, NoteAudio, NoteService};
pub use explain::{ExplanationService, GeminiClient};
pub use session::{InMemorySessionStore, SessionStore};
pub use speech::{ElevenLabsClient, SpeechService};

/// Errors returned by the external service clients.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Service error: {0}")]
    Remote(String),

    #[error("{0} API key is required")]
    MissingApiKey(&'static str),

    #[error("Service returned an empty response")]
    EmptyResponse,
}

/// Build the HTTP client shared by all service clients.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
}

/// Turn a non-success response into `ClientError::Status`.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}
