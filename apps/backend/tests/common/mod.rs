//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wiring the router to an in-memory session store
//! - Fake note, speech and explanation services with switchable failure
//!
//! Route tests need no external services. The PostgreSQL store tests
//! require DATABASE_URL and are ignored by default.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use flashcard_core::escape_search_term;
use flashcard_core::note::EXPRESSION_FIELD;

use greek_cards_backend::config::AppConfig;
use greek_cards_backend::services::{
    ClientError, ExplanationService, InMemorySessionStore, NewNote, NoteService, SpeechService,
};
use greek_cards_backend::{router, AppState};

pub const FAKE_AUDIO: &[u8] = b"ID3-fake-audio";

/// Test context holding the fakes behind a router.
pub struct TestContext {
    pub config: AppConfig,
    pub sessions: Arc<InMemorySessionStore>,
    pub notes: Arc<FakeNotes>,
    pub speech: Arc<FakeSpeech>,
    pub explainer: Arc<FakeExplainer>,
}

impl TestContext {
    /// Context without configured API keys.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Context with speech and explanation keys configured.
    pub fn with_api_keys() -> Self {
        Self::with_config(AppConfig {
            elevenlabs_api_key: Some("xi-test-key".to_string()),
            gemini_api_key: Some("gemini-test-key".to_string()),
            ..AppConfig::default()
        })
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            sessions: Arc::new(InMemorySessionStore::new()),
            notes: Arc::new(FakeNotes::default()),
            speech: Arc::new(FakeSpeech::default()),
            explainer: Arc::new(FakeExplainer::default()),
        }
    }

    /// Application state sharing this context's fakes.
    pub fn state(&self) -> AppState {
        AppState {
            config: Arc::new(self.config.clone()),
            sessions: self.sessions.clone(),
            notes: self.notes.clone(),
            speech: self.speech.clone(),
            explainer: self.explainer.clone(),
        }
    }

    /// Test server for the full router.
    pub fn server(&self) -> TestServer {
        TestServer::new(router(self.state())).unwrap()
    }
}

/// In-memory note collection.
#[derive(Default)]
pub struct FakeNotes {
    failing: AtomicBool,
    next_id: AtomicI64,
    existing: Mutex<HashMap<i64, String>>,
    rejected: Mutex<Vec<String>>,
    pub added: Mutex<Vec<(String, NewNote)>>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeNotes {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Seed a note with the given expression.
    pub fn insert_existing(&self, expression: &str) {
        let id = 1_000 + self.next_id.fetch_add(1, Ordering::SeqCst);
        self.existing
            .lock()
            .unwrap()
            .insert(id, expression.to_string());
    }

    /// Make `add_note` reject notes with this expression.
    pub fn reject(&self, expression: &str) {
        self.rejected.lock().unwrap().push(expression.to_string());
    }

    pub fn added_notes(&self) -> Vec<(String, NewNote)> {
        self.added.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), ClientError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Remote("collection unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl NoteService for FakeNotes {
    async fn version(&self, _url: &str) -> Result<i64, ClientError> {
        self.check()?;
        Ok(6)
    }

    async fn find_notes(&self, _url: &str, query: &str) -> Result<Vec<i64>, ClientError> {
        self.check()?;
        self.queries.lock().unwrap().push(query.to_string());

        let existing = self.existing.lock().unwrap();
        let mut ids: Vec<i64> = existing
            .iter()
            .filter(|(_, expr)| {
                query.contains(&format!(
                    "{}:\"{}\"",
                    EXPRESSION_FIELD,
                    escape_search_term(expr)
                ))
            })
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn note_expressions(
        &self,
        _url: &str,
        note_ids: &[i64],
    ) -> Result<std::collections::HashSet<String>, ClientError> {
        self.check()?;
        let existing = self.existing.lock().unwrap();
        Ok(note_ids
            .iter()
            .filter_map(|id| existing.get(id).cloned())
            .collect())
    }

    async fn add_note(&self, url: &str, note: NewNote) -> Result<i64, ClientError> {
        self.check()?;

        let expression = note.fields.get(EXPRESSION_FIELD).unwrap_or_default().to_string();
        if self.rejected.lock().unwrap().contains(&expression) {
            return Err(ClientError::Remote(
                "cannot create note because it is a duplicate".to_string(),
            ));
        }

        let id = 1 + self.next_id.fetch_add(1, Ordering::SeqCst);
        self.added.lock().unwrap().push((url.to_string(), note));
        Ok(id)
    }
}

/// Speech service returning fixed audio bytes.
#[derive(Default)]
pub struct FakeSpeech {
    failing: AtomicBool,
    /// (api_key, voice_id, text) per call
    pub calls: Mutex<Vec<(String, String, String)>>,
}

impl FakeSpeech {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechService for FakeSpeech {
    async fn synthesize(
        &self,
        api_key: &str,
        voice_id: &str,
        text: &str,
    ) -> Result<Vec<u8>, ClientError> {
        self.calls.lock().unwrap().push((
            api_key.to_string(),
            voice_id.to_string(),
            text.to_string(),
        ));
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 401,
                body: "invalid api key".to_string(),
            });
        }
        Ok(FAKE_AUDIO.to_vec())
    }
}

/// Explanation service echoing its inputs.
#[derive(Default)]
pub struct FakeExplainer {
    failing: AtomicBool,
}

impl FakeExplainer {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ExplanationService for FakeExplainer {
    async fn explain(
        &self,
        _api_key: &str,
        script: &str,
        gloss: &str,
    ) -> Result<String, ClientError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::EmptyResponse);
        }
        Ok(format!("Объяснение: {} ({})", script, gloss))
    }
}
