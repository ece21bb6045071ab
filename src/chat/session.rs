//! Handling a single user message: the assistant is idle until a
//! non-empty message arrives, answers it, then goes back to idle.

use super::links::annotate;
use super::models::{ChatMessage, Role, SessionState, Turn};
use crate::ai::QueryEngine;
use crate::core::QueryError;

/// Appended to every question so the answer comes back in Italian
/// whatever language the documents or the question are in.
pub const ITALIAN_ONLY_SUFFIX: &str = ". Rispondi sempre e solo in italiano";

pub fn augment_query(input: &str) -> String {
    format!("{}{}", input, ITALIAN_ONLY_SUFFIX)
}

/// Answer `input` and return the resulting turn, or `None` when the
/// input is blank and there is nothing to do.
pub async fn handle_message(
    engine: &dyn QueryEngine,
    input: &str,
) -> Result<Option<Turn>, QueryError> {
    if input.trim().is_empty() {
        return Ok(None);
    }

    let query = augment_query(input);
    let response = engine.query(&query).await.inspect_err(|e| {
        tracing::error!("Query failed: {}", e);
    })?;
    let links = annotate(&response.source_nodes);

    Ok(Some(Turn {
        question: ChatMessage::new(Role::User, input),
        answer: ChatMessage::new(Role::Assistant, &response.response_text),
        links,
    }))
}

/// Snapshot in, snapshot out. On failure the caller keeps `state`
/// as it was so the question can be retried.
pub async fn on_user_message(
    engine: &dyn QueryEngine,
    state: &SessionState,
    input: &str,
) -> Result<SessionState, QueryError> {
    match handle_message(engine, input).await? {
        Some(turn) => Ok(state.apply(turn)),
        None => Ok(state.clone()),
    }
}
