//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Three cards: two with gloss and annotation, one script-only.
pub const STUDY_TEXT: &str = "\
Χαίρε! hello
Привет

Γειά σου ;how are you
Как дела
Ευχαριστώ
Спасибо
";

/// Generate study text with `num_cards` numbered card pairs.
///
/// Card `n` has script `"n. Λέξη"` and translation `"word n\nслово n"`.
pub fn sample_study_text(num_cards: usize) -> String {
    (0..num_cards)
        .map(|i| format!("{}. Λέξη word {}\nслово {}", i + 1, i + 1, i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Create a parse request body.
pub fn parse_request(text: &str) -> serde_json::Value {
    json!({ "text": text })
}

/// Create a duplicate check request body.
pub fn duplicate_check_request(session_id: Uuid, deck_name: Option<&str>) -> serde_json::Value {
    match deck_name {
        Some(deck) => json!({ "session_id": session_id, "deck_name": deck }),
        None => json!({ "session_id": session_id }),
    }
}

/// Create a batch note creation request body.
pub fn create_cards_request(session_id: Uuid, deck_name: Option<&str>) -> serde_json::Value {
    json!({
        "session_id": session_id,
        "deck_name": deck_name,
    })
}

/// Create a single note creation request body.
pub fn create_single_request(session_id: Uuid, card_id: Uuid) -> serde_json::Value {
    json!({ "session_id": session_id, "card_id": card_id })
}
