pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::db::Database;
use crate::services::{
    AnkiConnectClient, ElevenLabsClient, ExplanationService, GeminiClient, InMemorySessionStore,
    NoteService, SessionStore, SpeechService,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<dyn SessionStore>,
    pub notes: Arc<dyn NoteService>,
    pub speech: Arc<dyn SpeechService>,
    pub explainer: Arc<dyn ExplanationService>,
}

impl AppState {
    /// Speech API key from the request, falling back to the configured one.
    pub fn speech_key<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        non_empty(requested).or(self.config.elevenlabs_api_key.as_deref())
    }

    /// Explanation API key from the request, falling back to the configured one.
    pub fn explanation_key<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        non_empty(requested).or(self.config.gemini_api_key.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/config", get(routes::settings::get_config))
        // Card routes
        .route("/api/cards/parse", post(routes::cards::parse))
        .route("/api/cards/check-duplicates", post(routes::cards::check_duplicates))
        .route("/api/cards/create-single", post(routes::cards::create_single))
        .route("/api/cards/create", post(routes::cards::create))
        .route("/api/cards/:session_id", get(routes::cards::get_session))
        .route("/api/cards/:session_id/:card_id", put(routes::cards::update_card))
        // Collaborator routes
        .route("/api/audio/generate", post(routes::audio::generate))
        .route("/api/explain", post(routes::explain::explain))
        .route("/api/anki/test", get(routes::anki::test_connection))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    let sessions: Arc<dyn SessionStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let db = Database::connect(database_url).await?;

            tracing::info!("Running migrations...");
            db.run_migrations().await?;

            Arc::new(db)
        }
        None => {
            tracing::info!("DATABASE_URL not set, keeping sessions in memory");
            Arc::new(InMemorySessionStore::new())
        }
    };

    let http = services::http_client()?;

    let state = AppState {
        config: Arc::new(config.clone()),
        sessions,
        notes: Arc::new(AnkiConnectClient::new(http.clone())),
        speech: Arc::new(ElevenLabsClient::new(http.clone())),
        explainer: Arc::new(GeminiClient::new(http)),
    };

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
