//! Session storage for parsed cards.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{CardDraft, CardPatch, Session};

/// Keyed storage of parsed card sessions.
///
/// Implementations serialize concurrent updates to the same session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get a session with its cards in parse order.
    async fn get(&self, session_id: Uuid) -> Result<Option<Session>>;

    /// Store cards under a session ID, replacing previous content.
    async fn put(&self, session_id: Uuid, cards: Vec<CardDraft>) -> Result<()>;

    /// Patch one card and return its new state.
    async fn update(&self, session_id: Uuid, card_id: Uuid, patch: CardPatch) -> Result<CardDraft>;
}

/// Process-local session store.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: Uuid) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn put(&self, session_id: Uuid, cards: Vec<CardDraft>) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session_id, Session::new(session_id, cards));
        Ok(())
    }

    async fn update(&self, session_id: Uuid, card_id: Uuid, patch: CardPatch) -> Result<CardDraft> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ApiError::NotFound(format!("Session {}", session_id)))?;
        let card = session
            .card_mut(card_id)
            .ok_or_else(|| ApiError::NotFound(format!("Card {}", card_id)))?;

        card.apply(patch);
        Ok(card.clone())
    }
}
