//! Duplicate detection against an existing note collection.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::note::EXPRESSION_FIELD;
use crate::types::CardDraft;

/// Build a single search query matching any of the given expressions,
/// optionally restricted to one deck.
///
/// ```text
/// deck:"Greek" ((Expression:"Ναι") OR (Expression:"Όχι"))
/// ```
pub fn find_notes_query<'a>(
    deck: Option<&str>,
    expressions: impl IntoIterator<Item = &'a str>,
) -> String {
    let terms = expressions
        .into_iter()
        .map(|e| format!("({}:\"{}\")", EXPRESSION_FIELD, escape_search_term(e)))
        .collect::<Vec<_>>()
        .join(" OR ");

    match deck.filter(|d| !d.is_empty()) {
        Some(deck) => format!("deck:\"{}\" ({})", escape_search_term(deck), terms),
        None => format!("({})", terms),
    }
}

/// Escape characters that are special inside a quoted search term.
pub fn escape_search_term(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if c == '\\' || c == '"' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Map each card to whether its script already exists as a note expression.
pub fn mark_duplicates(cards: &[CardDraft], existing: &HashSet<String>) -> HashMap<Uuid, bool> {
    cards
        .iter()
        .map(|card| (card.id, existing.contains(&card.script)))
        .collect()
}
