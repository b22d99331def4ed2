//! ElevenLabs text-to-speech client.

use async_trait::async_trait;
use serde::Serialize;

use super::{check_status, ClientError};

const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
const MODEL_ID: &str = "eleven_multilingual_v2";

/// Speech synthesis for card scripts.
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Synthesize `text` with the given voice and return the audio bytes.
    async fn synthesize(&self, api_key: &str, voice_id: &str, text: &str)
        -> Result<Vec<u8>, ClientError>;
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

/// HTTP client for the ElevenLabs API.
pub struct ElevenLabsClient {
    client: reqwest::Client,
    base_url: String,
}

impl ElevenLabsClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            voice_id
        )
    }
}

#[async_trait]
impl SpeechService for ElevenLabsClient {
    async fn synthesize(
        &self,
        api_key: &str,
        voice_id: &str,
        text: &str,
    ) -> Result<Vec<u8>, ClientError> {
        let request = SpeechRequest {
            text,
            model_id: MODEL_ID,
            voice_settings: VoiceSettings::default(),
        };

        let response = self
            .client
            .post(self.endpoint(voice_id))
            .header("xi-api-key", api_key)
            .json(&request)
            .send()
            .await?;
        let response = check_status(response).await?;

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(ClientError::EmptyResponse);
        }

        tracing::debug!("Synthesized {} bytes of audio", audio.len());
        Ok(audio.to_vec())
    }
}
