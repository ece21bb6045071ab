//! Router for the chat API

use std::sync::{Arc, RwLock};
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::chat::handle_message;

type SharedState = Arc<RwLock<AppState>>;

/// Get the transcript of a chat session by ID
async fn chat_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<public::ChatTranscriptResponse>, ApiError> {
    let session = state
        .read()
        .expect("Unable to read share state")
        .sessions
        .get(&id);

    let Some(session) = session else {
        return Err(ApiError::not_found(&format!(
            "Chat session {} not found",
            id
        )));
    };

    Ok(Json(public::ChatTranscriptResponse {
        transcript: session.messages().to_vec(),
    }))
}

/// End a chat session and forget its history
async fn end_chat_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .write()
        .expect("Unable to write share state")
        .sessions
        .end(&id);

    if !removed {
        return Err(ApiError::not_found(&format!(
            "Chat session {} not found",
            id
        )));
    }
    tracing::info!("Ended chat session {}", id);

    Ok(StatusCode::NO_CONTENT)
}

/// Ask a question in a chat session, creating the session if needed
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ChatRequest>,
) -> Result<Json<public::ChatResponse>, ApiError> {
    let public::ChatRequest {
        session_id,
        message,
    } = payload;

    if session_id.trim().is_empty() {
        return Err(ApiError::bad_request("Missing session_id"));
    }
    if message.trim().is_empty() {
        return Err(ApiError::bad_request("Message must not be empty"));
    }

    // The lock must be released before waiting on the query engine
    let engine = {
        let mut shared_state = state.write().expect("Unable to write share state");
        shared_state
            .sessions
            .get_or_create(&session_id, Instant::now());
        Arc::clone(&shared_state.engine)
    };

    let Some(turn) = handle_message(engine.as_ref(), &message).await? else {
        return Err(ApiError::bad_request("Message must not be empty"));
    };

    let answer = turn.answer.content().to_string();
    let links = turn.links.iter().map(public::LinkResponse::from).collect();
    let session = state
        .write()
        .expect("Unable to write share state")
        .sessions
        .commit(&session_id, turn, Instant::now());
    // Ended or expired while the answer was on its way
    let Some(session) = session else {
        return Err(ApiError::not_found(&format!(
            "Chat session {} not found",
            session_id
        )));
    };

    Ok(Json(public::ChatResponse {
        session_id,
        answer,
        links,
        transcript: session.messages().to_vec(),
    }))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(chat_handler))
        .route("/{id}", get(chat_session).delete(end_chat_session))
}
