//! Router for the chat page

use std::sync::{Arc, RwLock};
use std::time::Instant;

use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use super::public::{self, SESSION_COOKIE};
use super::render::render_page;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::chat::handle_message;

type SharedState = Arc<RwLock<AppState>>;

/// Use the session from the cookie or issue a new one.
fn session_from_cookie(jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let id = cookie.value().to_string();
        if !id.is_empty() {
            return (jar, id);
        }
    }

    let id = Uuid::new_v4().to_string();
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), id)
}

/// Show the conversation so far
async fn chat_page(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), ApiError> {
    let (jar, session_id) = session_from_cookie(jar);
    let session = state
        .write()
        .expect("Unable to write share state")
        .sessions
        .get_or_create(&session_id, Instant::now());

    Ok((jar, Html(render_page(&session, None)?)))
}

/// Ask a question from the page form. On success redirect back to
/// the page so a reload doesn't ask again. On failure show the error
/// inline with the conversation as it currently is.
async fn ask(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<public::AskForm>,
) -> Result<Response, ApiError> {
    let (jar, session_id) = session_from_cookie(jar);
    let engine = {
        let mut shared_state = state.write().expect("Unable to write share state");
        shared_state
            .sessions
            .get_or_create(&session_id, Instant::now());
        Arc::clone(&shared_state.engine)
    };

    match handle_message(engine.as_ref(), &form.prompt).await {
        Ok(Some(turn)) => {
            let committed = state
                .write()
                .expect("Unable to write share state")
                .sessions
                .commit(&session_id, turn, Instant::now());
            // The session ended while answering, start over with a new one
            let jar = match committed {
                Some(_) => jar,
                None => jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
            };
            Ok((jar, Redirect::to("/")).into_response())
        }
        Ok(None) => Ok((jar, Redirect::to("/")).into_response()),
        Err(e) => {
            let msg = format!(
                "Non sono riuscita a rispondere, riprova tra poco. ({})",
                e
            );
            // Other tabs may have added turns while this one was waiting
            let session = state
                .read()
                .expect("Unable to read share state")
                .sessions
                .get(&session_id)
                .unwrap_or_default();
            let page = render_page(&session, Some(&msg))?;
            Ok((StatusCode::BAD_GATEWAY, jar, Html(page)).into_response())
        }
    }
}

/// Create the chat page router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(chat_page).post(ask))
}
