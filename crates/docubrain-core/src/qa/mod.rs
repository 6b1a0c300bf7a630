//! Remote question-answering contract.
//!
//! The QA backend is an external collaborator: one text message in, one
//! reply plus ranked citations out. Implementations live in
//! `docubrain-interaction`; this module only fixes the shape of the call.

use crate::error::Result;
use crate::session::Source;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    /// Citations in the backend's ranking order.
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// A single-shot question-answering call.
///
/// There is no streaming and no cancellation. Every failure (transport,
/// non-success status, malformed body, missing configuration) is an `Err`;
/// callers treat them all alike.
#[async_trait]
pub trait QaClient: Send + Sync {
    async fn ask(&self, message: &str) -> Result<ChatReply>;
}
