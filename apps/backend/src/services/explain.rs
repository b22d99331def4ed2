//! Gemini client generating short Russian explanations for cards.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{check_status, ClientError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MODEL: &str = "gemini-2.0-flash";
const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 200;

/// Explanation generation keyed by a script and its gloss.
#[async_trait]
pub trait ExplanationService: Send + Sync {
    async fn explain(&self, api_key: &str, script: &str, gloss: &str)
        -> Result<String, ClientError>;
}

/// Prompt asking for a two or three sentence explanation in Russian.
pub fn build_prompt(script: &str, gloss: &str) -> String {
    format!(
        "Ты преподаёшь греческий язык. Кратко объясни по-русски (не больше 2-3 предложений) \
         греческое слово или фразу ниже.\n\n\
         Греческий текст: {}\n\
         Перевод на английский: {}\n\n\
         Объяснение должно помогать запомнить слово. Если уместно, укажи, в каком контексте оно употребляется.",
        script, gloss
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// First part of the first candidate, trimmed.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

/// HTTP client for the Gemini generateContent API.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            MODEL
        )
    }
}

#[async_trait]
impl ExplanationService for GeminiClient {
    async fn explain(&self, api_key: &str, script: &str, gloss: &str) -> Result<String, ClientError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(script, gloss)),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        tracing::info!("Requesting explanation for: {}", script);

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;
        let response = check_status(response).await?;

        let body: GenerateResponse = response.json().await?;
        body.first_text().ok_or(ClientError::EmptyResponse)
    }
}
