//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, SourceLink};

#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct LinkResponse {
    pub title: String,
    pub url: String,
    pub markdown: String,
}

impl From<&SourceLink> for LinkResponse {
    fn from(link: &SourceLink) -> Self {
        Self {
            title: link.title.to_string(),
            url: link.url.to_string(),
            markdown: link.markdown(),
        }
    }
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub answer: String,
    pub links: Vec<LinkResponse>,
    pub transcript: Vec<ChatMessage>,
}

#[derive(Serialize)]
pub struct ChatTranscriptResponse {
    pub transcript: Vec<ChatMessage>,
}
