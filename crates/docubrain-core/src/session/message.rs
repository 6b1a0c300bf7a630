//! Conversation message types.
//!
//! This module contains the types for the messages of a chat session and
//! the documents an assistant reply can cite.

use serde::{Deserialize, Serialize};

/// Greeting seeded into every new session.
pub const GREETING: &str = "Hello! I'm DocuBrain Agent. Ask me anything about your documents.";

/// Assistant message appended when the QA backend call fails.
pub const APOLOGY: &str = "Sorry, something went wrong. Please try again.";

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Message produced by the QA agent (including greetings and apologies).
    Assistant,
}

/// A cited document excerpt attached to an assistant reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Excerpt from the cited document.
    pub text: String,
    /// Identifying label of the document, usually its file name.
    pub filename: String,
    /// Relevance score in `[0, 1]`.
    pub score: f64,
}

impl Source {
    pub fn new(filename: impl Into<String>, text: impl Into<String>, score: f64) -> Self {
        Self {
            text: text.into(),
            filename: filename.into(),
            score,
        }
    }

    /// Score as a whole percentage, rounding halves up (`0.925` -> `93`).
    pub fn score_percent(&self) -> i64 {
        (self.score * 100.0).round() as i64
    }

    /// Label shown next to the file name, e.g. `92% match`.
    pub fn match_label(&self) -> String {
        format!("{}% match", self.score_percent())
    }
}

/// A single message in a session's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    /// Cited documents; only ever set on assistant replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            sources: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            sources: None,
        }
    }

    pub fn assistant_with_sources(content: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            sources: Some(sources),
        }
    }

    pub fn greeting() -> Self {
        Self::assistant(GREETING)
    }

    pub fn apology() -> Self {
        Self::assistant(APOLOGY)
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    /// Sources to render; empty when the reply cites nothing.
    pub fn cited_sources(&self) -> &[Source] {
        self.sources.as_deref().unwrap_or_default()
    }
}
