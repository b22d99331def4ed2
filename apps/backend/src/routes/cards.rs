//! Card parsing, session and export endpoints

use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use flashcard_core::{audio_filename, find_notes_query, mark_duplicates, segment, NoteFields, NOTE_TAGS};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::{ClientError, NewNote, NoteAudio, NoteService};
use crate::AppState;

/// POST /api/cards/parse
/// Segments study text into cards and stores them under a new session
pub async fn parse(
    State(state): State<AppState>,
    Json(request): Json<ParseRequest>,
) -> Result<Json<ParseResponse>> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("No text provided".to_string()));
    }

    let cards = segment(&request.text);
    if cards.is_empty() {
        return Err(ApiError::NoCards);
    }

    let session_id = Uuid::new_v4();
    state.sessions.put(session_id, cards.clone()).await?;

    tracing::info!("Parsed {} cards into session {}", cards.len(), session_id);

    Ok(Json(ParseResponse { session_id, cards }))
}

/// GET /api/cards/:session_id
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<CardDraft>>> {
    let session = load_session(&state, session_id).await?;
    Ok(Json(session.cards))
}

/// PUT /api/cards/:session_id/:card_id
pub async fn update_card(
    State(state): State<AppState>,
    Path((session_id, card_id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<CardPatch>,
) -> Result<Json<CardDraft>> {
    let card = state.sessions.update(session_id, card_id, patch).await?;
    Ok(Json(card))
}

/// POST /api/cards/check-duplicates
/// Looks up every card of a session in the note collection and deselects
/// the ones that already exist. A failed lookup marks every card unknown
/// and leaves selection untouched.
pub async fn check_duplicates(
    State(state): State<AppState>,
    Json(request): Json<DuplicateCheckRequest>,
) -> Result<Json<DuplicateCheckResponse>> {
    let session = load_session(&state, request.session_id).await?;
    if session.cards.is_empty() {
        return Ok(Json(DuplicateCheckResponse::new()));
    }

    let url = request
        .anki_connect_url
        .unwrap_or_else(|| state.config.anki_connect_url.clone());
    let query = find_notes_query(
        request.deck_name.as_deref(),
        session.cards.iter().map(|c| c.script.as_str()),
    );

    tracing::info!("Checking {} cards for duplicates", session.cards.len());

    let existing = match existing_expressions(state.notes.as_ref(), &url, &query).await {
        Ok(existing) => existing,
        Err(e) => {
            tracing::warn!("Duplicate check failed, results unknown: {}", e);
            let reason = e.to_string();
            return Ok(Json(
                session
                    .cards
                    .iter()
                    .map(|c| (c.id, Outcome::unknown(false, reason.clone())))
                    .collect(),
            ));
        }
    };

    let marks = mark_duplicates(&session.cards, &existing);
    for card in &session.cards {
        if marks.get(&card.id).copied().unwrap_or(false) {
            tracing::info!("Found duplicate, deselecting: {}", card.script);
            state
                .sessions
                .update(session.id, card.id, CardPatch::selected(false))
                .await?;
        }
    }

    Ok(Json(
        marks
            .into_iter()
            .map(|(id, duplicate)| (id, Outcome::confirmed(duplicate)))
            .collect(),
    ))
}

/// POST /api/cards/create-single
pub async fn create_single(
    State(state): State<AppState>,
    Json(request): Json<CreateSingleCardRequest>,
) -> Result<Json<CardCreationResult>> {
    let session = load_session(&state, request.session_id).await?;
    let card = session
        .card(request.card_id)
        .ok_or_else(|| ApiError::NotFound(format!("Card {}", request.card_id)))?;

    Ok(Json(export_card(&state, card, &request.options).await))
}

/// POST /api/cards/create
/// Exports every selected card of a session; one failure does not stop
/// the rest.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateCardsRequest>,
) -> Result<Json<Vec<CardCreationResult>>> {
    let session = load_session(&state, request.session_id).await?;
    let selected: Vec<&CardDraft> = session.cards.iter().filter(|c| c.selected).collect();

    tracing::info!("Creating {} notes", selected.len());

    let mut results = Vec::with_capacity(selected.len());
    for card in selected {
        results.push(export_card(&state, card, &request.options).await);
    }

    Ok(Json(results))
}

async fn load_session(state: &AppState, session_id: Uuid) -> Result<Session> {
    state
        .sessions
        .get(session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Session {}", session_id)))
}

async fn existing_expressions(
    notes: &dyn NoteService,
    url: &str,
    query: &str,
) -> std::result::Result<HashSet<String>, ClientError> {
    let note_ids = notes.find_notes(url, query).await?;
    if note_ids.is_empty() {
        return Ok(HashSet::new());
    }
    notes.note_expressions(url, &note_ids).await
}

/// Synthesize audio (when a speech key is available) and add one note.
async fn export_card(state: &AppState, card: &CardDraft, options: &ExportOptions) -> CardCreationResult {
    let (audio, audio_outcome) = match state.speech_key(options.elevenlabs_api_key.as_deref()) {
        None => (None, None),
        Some(api_key) => {
            let voice_id = options
                .voice_id
                .as_deref()
                .unwrap_or(&state.config.default_voice_id);
            match state.speech.synthesize(api_key, voice_id, &card.script).await {
                Ok(bytes) => (
                    Some(vec![NoteAudio::for_audio_field(
                        general_purpose::STANDARD.encode(bytes),
                        audio_filename(card.id),
                    )]),
                    Some(Outcome::confirmed(true)),
                ),
                Err(e) => {
                    tracing::warn!("Audio generation failed for {}: {}", card.script, e);
                    (None, Some(Outcome::unknown(false, e.to_string())))
                }
            }
        }
    };

    let note = NewNote {
        deck_name: options
            .deck_name
            .clone()
            .unwrap_or_else(|| state.config.default_deck.clone()),
        model_name: options
            .model_name
            .clone()
            .unwrap_or_else(|| state.config.default_model.clone()),
        fields: NoteFields::from_card(card),
        tags: NOTE_TAGS.iter().map(|t| t.to_string()).collect(),
        audio,
    };
    let url = options
        .anki_connect_url
        .as_deref()
        .unwrap_or(&state.config.anki_connect_url);

    tracing::info!("Creating note: {}", card.script);

    match state.notes.add_note(url, note).await {
        Ok(note_id) => CardCreationResult {
            card_id: card.id,
            success: true,
            note_id: Some(note_id),
            error: None,
            audio: audio_outcome,
        },
        Err(e) => {
            tracing::warn!("Note creation failed for {}: {}", card.script, e);
            CardCreationResult {
                card_id: card.id,
                success: false,
                note_id: None,
                error: Some(e.to_string()),
                audio: audio_outcome,
            }
        }
    }
}
