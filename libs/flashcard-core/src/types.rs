//! Core types for the flashcard builder.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Card produced by segmentation, before any enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDraft {
    pub id: Uuid,
    pub script: String,
    pub translation: String,
    pub annotation: String,
    pub selected: bool,
}

impl CardDraft {
    /// Create a new selected card with a fresh ID and empty annotation.
    pub fn new(script: String, translation: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            script,
            translation,
            annotation: String::new(),
            selected: true,
        }
    }

    /// Apply a partial update. `id` and `script` never change.
    pub fn apply(&mut self, patch: CardPatch) {
        if let Some(translation) = patch.translation {
            self.translation = translation;
        }
        if let Some(annotation) = patch.annotation {
            self.annotation = annotation;
        }
        if let Some(selected) = patch.selected {
            self.selected = selected;
        }
    }
}

/// Partial update of the mutable card fields (all optional).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
}

impl CardPatch {
    /// Patch that only toggles selection.
    pub fn selected(selected: bool) -> Self {
        Self {
            selected: Some(selected),
            ..Self::default()
        }
    }
}

/// Result of a best-effort call to an external service.
///
/// `Unknown` carries the value that was applied in place of a real answer,
/// so callers can tell a confirmed `false` from a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Confirmed { value: T },
    Unknown { fallback: T, reason: String },
}

impl<T> Outcome<T> {
    pub fn confirmed(value: T) -> Self {
        Self::Confirmed { value }
    }

    pub fn unknown(fallback: T, reason: impl Into<String>) -> Self {
        Self::Unknown {
            fallback,
            reason: reason.into(),
        }
    }

    /// The effective value, confirmed or not.
    pub fn value(&self) -> &T {
        match self {
            Self::Confirmed { value } => value,
            Self::Unknown { fallback, .. } => fallback,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_card_defaults() {
        let card = CardDraft::new("Ναι".to_string(), "Yes".to_string());
        assert!(card.selected);
        assert!(card.annotation.is_empty());
        assert_ne!(card.id, Uuid::nil());
    }

    #[test]
    fn apply_patch_keeps_identity() {
        let mut card = CardDraft::new("Ναι".to_string(), "Yes".to_string());
        let id = card.id;

        card.apply(CardPatch {
            translation: Some("Yes\nДа".to_string()),
            annotation: Some("утвердительный ответ".to_string()),
            selected: Some(false),
        });

        assert_eq!(card.id, id);
        assert_eq!(card.script, "Ναι");
        assert_eq!(card.translation, "Yes\nДа");
        assert_eq!(card.annotation, "утвердительный ответ");
        assert!(!card.selected);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut card = CardDraft::new("Ναι".to_string(), "Yes".to_string());
        let before = card.clone();
        card.apply(CardPatch::default());
        assert_eq!(card, before);
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let confirmed = serde_json::to_value(Outcome::confirmed(true)).unwrap();
        assert_eq!(confirmed["status"], "confirmed");
        assert_eq!(confirmed["value"], true);

        let unknown = serde_json::to_value(Outcome::unknown(false, "timeout")).unwrap();
        assert_eq!(unknown["status"], "unknown");
        assert_eq!(unknown["fallback"], false);
        assert_eq!(unknown["reason"], "timeout");
    }

    #[test]
    fn outcome_value_reads_fallback() {
        let outcome = Outcome::unknown(false, "connection refused");
        assert!(!outcome.is_confirmed());
        assert!(!*outcome.value());
    }
}
