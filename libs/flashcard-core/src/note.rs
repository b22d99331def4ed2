//! Note field layout for exported cards.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::types::CardDraft;

pub const EXPRESSION_FIELD: &str = "Expression";
pub const MEANING_FIELD: &str = "Meaning";
pub const EXPLANATION_FIELD: &str = "RussianExplanation";
pub const AUDIO_FIELD: &str = "Audio";

/// Tags attached to every exported note.
pub const NOTE_TAGS: &[&str] = &["greek", "elevenlabs"];

/// Field values of one exported note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NoteFields(BTreeMap<&'static str, String>);

impl NoteFields {
    /// Build note fields from a card. Newlines become `<br>` since note
    /// fields are rendered as HTML. The audio field is left empty and
    /// filled by the note service when audio is attached.
    pub fn from_card(card: &CardDraft) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(EXPRESSION_FIELD, card.script.clone());
        fields.insert(MEANING_FIELD, to_html_lines(&card.translation));
        fields.insert(EXPLANATION_FIELD, to_html_lines(&card.annotation));
        fields.insert(AUDIO_FIELD, String::new());
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

/// File name under which a card's audio is stored.
pub fn audio_filename(card_id: Uuid) -> String {
    format!("greek_{}.mp3", card_id)
}

fn to_html_lines(text: &str) -> String {
    text.replace('\n', "<br>")
}
