//! The core models for a conversation with the assistant.
use serde::{Deserialize, Serialize};

use super::links::SourceLink;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChatMessage {
    role: Role,
    content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// One exchange: the user's question, the assistant's answer and the
/// source links found for it.
#[derive(Clone, Debug, PartialEq)]
pub struct Turn {
    pub question: ChatMessage,
    pub answer: ChatMessage,
    pub links: Vec<SourceLink>,
}

/// Immutable snapshot of a conversation. Applying a turn yields a
/// new snapshot and leaves this one untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    messages: Vec<ChatMessage>,
    // Links of the latest answer only, older answers show text only
    last_links: Vec<SourceLink>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_links(&self) -> &[SourceLink] {
        &self.last_links
    }

    pub fn last_answer(&self) -> Option<&ChatMessage> {
        self.messages
            .last()
            .filter(|m| m.role() == Role::Assistant)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn apply(&self, turn: Turn) -> SessionState {
        let mut messages = Vec::with_capacity(self.messages.len() + 2);
        messages.extend_from_slice(&self.messages);
        messages.push(turn.question);
        messages.push(turn.answer);
        SessionState {
            messages,
            last_links: turn.links,
        }
    }
}
