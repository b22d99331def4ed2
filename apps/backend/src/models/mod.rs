//! Database models and API types

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from flashcard-core
pub use flashcard_core::types::{CardDraft, CardPatch, Outcome};

// === Session Types ===

/// Cards parsed from one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub cards: Vec<CardDraft>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: Uuid, cards: Vec<CardDraft>) -> Self {
        Self {
            id,
            cards,
            created_at: Utc::now(),
        }
    }

    pub fn card(&self, card_id: Uuid) -> Option<&CardDraft> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn card_mut(&mut self, card_id: Uuid) -> Option<&mut CardDraft> {
        self.cards.iter_mut().find(|c| c.id == card_id)
    }
}

/// Card row stored in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbSessionCard {
    pub session_id: Uuid,
    pub card_id: Uuid,
    pub position: i32,
    pub script: String,
    pub translation: String,
    pub annotation: String,
    pub selected: bool,
}

impl DbSessionCard {
    pub fn from_card(session_id: Uuid, position: i32, card: &CardDraft) -> Self {
        Self {
            session_id,
            card_id: card.id,
            position,
            script: card.script.clone(),
            translation: card.translation.clone(),
            annotation: card.annotation.clone(),
            selected: card.selected,
        }
    }

    /// Convert to API card type
    pub fn to_card(&self) -> CardDraft {
        CardDraft {
            id: self.card_id,
            script: self.script.clone(),
            translation: self.translation.clone(),
            annotation: self.annotation.clone(),
            selected: self.selected,
        }
    }
}

// === API Request/Response Types ===

/// Client-facing defaults
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub default_voice_id: String,
    pub anki_connect_url: String,
    pub default_deck: String,
    pub default_model: String,
    pub elevenlabs_configured: bool,
    pub gemini_configured: bool,
}

/// Parse request
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    #[serde(default)]
    pub text: String,
}

/// Parse response
#[derive(Debug, Serialize, Deserialize)]
pub struct ParseResponse {
    pub session_id: Uuid,
    pub cards: Vec<CardDraft>,
}

/// Duplicate check request
#[derive(Debug, Deserialize)]
pub struct DuplicateCheckRequest {
    pub session_id: Uuid,
    pub anki_connect_url: Option<String>,
    pub deck_name: Option<String>,
}

/// Duplicate status per card ID
pub type DuplicateCheckResponse = HashMap<Uuid, Outcome<bool>>;

/// Audio generation request
#[derive(Debug, Deserialize)]
pub struct AudioGenerateRequest {
    pub text: String,
    pub api_key: Option<String>,
    pub voice_id: Option<String>,
}

/// Base64-encoded audio
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioGenerateResponse {
    pub audio: String,
}

/// Explanation request
#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub script: String,
    #[serde(default)]
    pub gloss: String,
    pub api_key: Option<String>,
}

/// Explanation response
#[derive(Debug, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

/// Note export options shared by single and batch creation
#[derive(Debug, Default, Deserialize)]
pub struct ExportOptions {
    pub elevenlabs_api_key: Option<String>,
    pub voice_id: Option<String>,
    pub deck_name: Option<String>,
    pub model_name: Option<String>,
    pub anki_connect_url: Option<String>,
}

/// Single note creation request
#[derive(Debug, Deserialize)]
pub struct CreateSingleCardRequest {
    pub session_id: Uuid,
    pub card_id: Uuid,
    #[serde(flatten)]
    pub options: ExportOptions,
}

/// Batch note creation request
#[derive(Debug, Deserialize)]
pub struct CreateCardsRequest {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub options: ExportOptions,
}

/// Result of creating one note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardCreationResult {
    pub card_id: Uuid,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether audio was attached. `None` when no speech key was available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Outcome<bool>>,
}

/// AnkiConnect probe query
#[derive(Debug, Deserialize)]
pub struct AnkiTestQuery {
    pub url: Option<String>,
}

/// AnkiConnect probe result
#[derive(Debug, Serialize, Deserialize)]
pub struct AnkiTestResponse {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_card_lookup() {
        let cards = vec![
            CardDraft::new("Ναι".to_string(), "Yes".to_string()),
            CardDraft::new("Όχι".to_string(), "No".to_string()),
        ];
        let second = cards[1].id;
        let mut session = Session::new(Uuid::new_v4(), cards);

        assert_eq!(session.card(second).map(|c| c.script.as_str()), Some("Όχι"));
        assert!(session.card(Uuid::new_v4()).is_none());

        session.card_mut(second).unwrap().selected = false;
        assert!(!session.cards[1].selected);
    }

    #[test]
    fn test_db_card_round_trip() {
        let mut card = CardDraft::new("Χαίρε!".to_string(), "hello\nПривет".to_string());
        card.annotation = "приветствие".to_string();
        card.selected = false;

        let row = DbSessionCard::from_card(Uuid::new_v4(), 3, &card);
        assert_eq!(row.position, 3);
        assert_eq!(row.to_card(), card);
    }

    #[test]
    fn test_create_single_request_flattens_options() {
        let json = serde_json::json!({
            "session_id": Uuid::nil(),
            "card_id": Uuid::nil(),
            "deck_name": "Greek",
            "voice_id": "voice-1"
        });
        let request: CreateSingleCardRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.options.deck_name.as_deref(), Some("Greek"));
        assert_eq!(request.options.voice_id.as_deref(), Some("voice-1"));
        assert!(request.options.elevenlabs_api_key.is_none());
    }
}
