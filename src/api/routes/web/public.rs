//! Public types for the chat page
use serde::Deserialize;

/// Name of the cookie holding the browser's session ID
pub const SESSION_COOKIE: &str = "rachelbot_session";

#[derive(Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub prompt: String,
}
