//! AnkiConnect client for duplicate lookup and note creation.

use std::collections::HashSet;

use async_trait::async_trait;
use flashcard_core::note::{AUDIO_FIELD, EXPRESSION_FIELD};
use flashcard_core::NoteFields;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{check_status, ClientError};

/// AnkiConnect API version spoken by this client.
const API_VERSION: u32 = 6;

/// Audio attached to a new note.
#[derive(Debug, Clone, Serialize)]
pub struct NoteAudio {
    /// Base64-encoded audio bytes
    pub data: String,
    pub filename: String,
    pub fields: Vec<String>,
}

impl NoteAudio {
    /// Audio stored in the note's audio field.
    pub fn for_audio_field(data: String, filename: String) -> Self {
        Self {
            data,
            filename,
            fields: vec![AUDIO_FIELD.to_string()],
        }
    }
}

/// Note to be added to a collection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub deck_name: String,
    pub model_name: String,
    pub fields: NoteFields,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Vec<NoteAudio>>,
}

/// Note collection operations, addressed by service URL.
#[async_trait]
pub trait NoteService: Send + Sync {
    /// Protocol version reported by the service.
    async fn version(&self, url: &str) -> Result<i64, ClientError>;

    /// IDs of notes matching a search query.
    async fn find_notes(&self, url: &str, query: &str) -> Result<Vec<i64>, ClientError>;

    /// Expression field values of the given notes.
    async fn note_expressions(&self, url: &str, note_ids: &[i64])
        -> Result<HashSet<String>, ClientError>;

    /// Add a note and return its ID.
    async fn add_note(&self, url: &str, note: NewNote) -> Result<i64, ClientError>;
}

/// Response envelope: exactly one of `result` / `error` is meaningful.
#[derive(Debug, Deserialize)]
struct AnkiResponse<T> {
    result: Option<T>,
    error: Option<String>,
}

impl<T> AnkiResponse<T> {
    fn into_result(self) -> Result<T, ClientError> {
        if let Some(error) = self.error {
            return Err(ClientError::Remote(error));
        }
        self.result.ok_or(ClientError::EmptyResponse)
    }
}

#[derive(Debug, Deserialize)]
struct NoteInfo {
    #[serde(default)]
    fields: std::collections::HashMap<String, NoteFieldValue>,
}

#[derive(Debug, Deserialize)]
struct NoteFieldValue {
    value: String,
}

/// HTTP client for the AnkiConnect add-on.
pub struct AnkiConnectClient {
    client: reqwest::Client,
}

impl AnkiConnectClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn invoke<T: DeserializeOwned>(
        &self,
        url: &str,
        action: &str,
        params: Option<Value>,
    ) -> Result<T, ClientError> {
        let mut body = json!({ "action": action, "version": API_VERSION });
        if let Some(params) = params {
            body["params"] = params;
        }

        tracing::debug!("AnkiConnect {} -> {}", action, url);

        let response = self.client.post(url).json(&body).send().await?;
        let response = check_status(response).await?;
        let envelope: AnkiResponse<T> = response.json().await?;
        envelope.into_result()
    }
}

#[async_trait]
impl NoteService for AnkiConnectClient {
    async fn version(&self, url: &str) -> Result<i64, ClientError> {
        self.invoke(url, "version", None).await
    }

    async fn find_notes(&self, url: &str, query: &str) -> Result<Vec<i64>, ClientError> {
        self.invoke(url, "findNotes", Some(json!({ "query": query })))
            .await
    }

    async fn note_expressions(
        &self,
        url: &str,
        note_ids: &[i64],
    ) -> Result<HashSet<String>, ClientError> {
        if note_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let notes: Vec<NoteInfo> = self
            .invoke(url, "notesInfo", Some(json!({ "notes": note_ids })))
            .await?;
        Ok(expressions_of(notes))
    }

    async fn add_note(&self, url: &str, note: NewNote) -> Result<i64, ClientError> {
        let note_id: i64 = self
            .invoke(url, "addNote", Some(json!({ "note": note })))
            .await?;
        if note_id <= 0 {
            return Err(ClientError::Remote(format!("invalid note id {}", note_id)));
        }
        Ok(note_id)
    }
}

fn expressions_of(notes: Vec<NoteInfo>) -> HashSet<String> {
    notes
        .into_iter()
        .filter_map(|mut note| note.fields.remove(EXPRESSION_FIELD))
        .map(|field| field.value)
        .collect()
}
