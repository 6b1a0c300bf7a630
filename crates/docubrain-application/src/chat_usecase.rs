//! Chat use case implementation.
//!
//! `ChatUseCase` is the state behind the conversation view: the input box,
//! the loading flag and the session list. Rendering reads it; user actions
//! call into it.

use docubrain_core::error::{DocubrainError, Result};
use docubrain_core::qa::{ChatReply, QaClient};
use docubrain_core::session::{Session, SessionManager, SessionStore};
use std::sync::Arc;
use tracing::{error, info};

/// A send that has appended its user message and awaits the QA reply.
///
/// The target session is captured here, so the reply lands in the session
/// the message was sent from even if the user switched away meanwhile.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSend {
    pub session_id: String,
    pub message: String,
}

/// How a send settled. Exactly one assistant message was appended either way.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Answered { session_id: String },
    Failed { session_id: String, error: DocubrainError },
}

impl SendOutcome {
    pub fn session_id(&self) -> &str {
        match self {
            Self::Answered { session_id } | Self::Failed { session_id, .. } => session_id,
        }
    }
}

pub struct ChatUseCase {
    sessions: SessionManager,
    qa_client: Arc<dyn QaClient>,
    /// Input box text, independent of the session list
    input: String,
    /// Set while a QA request is in flight; gates further sends
    is_loading: bool,
}

impl ChatUseCase {
    pub fn new(sessions: SessionManager, qa_client: Arc<dyn QaClient>) -> Self {
        Self {
            sessions,
            qa_client,
            input: String::new(),
            is_loading: false,
        }
    }

    /// Restores history from `store` and wires the QA client.
    pub async fn open(store: Arc<dyn SessionStore>, qa_client: Arc<dyn QaClient>) -> Self {
        Self::new(SessionManager::open(store).await, qa_client)
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.sessions.active_session()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether the send affordance is enabled.
    pub fn can_send(&self) -> bool {
        !self.is_loading && !self.input.trim().is_empty()
    }

    pub async fn new_chat(&mut self) -> Session {
        self.sessions.create_session().await
    }

    pub fn select_chat(&mut self, session_id: &str) -> bool {
        self.sessions.select_session(session_id)
    }

    pub async fn delete_chat(&mut self, session_id: &str) -> bool {
        self.sessions.delete_session(session_id).await
    }

    /// Sends the input box content and appends the reply.
    ///
    /// Returns `None` when the send is ignored (blank input, a request
    /// already in flight, or no active session).
    pub async fn send(&mut self) -> Option<SendOutcome> {
        let pending = self.begin_send().await?;
        let qa_client = Arc::clone(&self.qa_client);
        let result = qa_client.ask(&pending.message).await;
        Some(self.finish_send(pending, result).await)
    }

    /// First half of a send: validate, clear the input, append the user
    /// message and raise the loading flag.
    pub async fn begin_send(&mut self) -> Option<PendingSend> {
        if self.input.trim().is_empty() || self.is_loading {
            return None;
        }
        let session_id = self.sessions.active_session_id()?.to_string();

        let message = std::mem::take(&mut self.input);
        self.is_loading = true;
        self.sessions.append_user_message(&session_id, &message).await;
        info!("Sending message in session {}", session_id);

        Some(PendingSend {
            session_id,
            message,
        })
    }

    /// Second half of a send: append the reply (or the apology) to the
    /// captured session and clear the loading flag.
    pub async fn finish_send(
        &mut self,
        pending: PendingSend,
        result: Result<ChatReply>,
    ) -> SendOutcome {
        let PendingSend { session_id, .. } = pending;
        let outcome = match result {
            Ok(reply) => {
                self.sessions
                    .append_assistant_message(&session_id, &reply.reply, Some(reply.sources))
                    .await;
                SendOutcome::Answered { session_id }
            }
            Err(e) => {
                error!("QA call for session {} failed: {}", session_id, e);
                self.sessions.append_assistant_error(&session_id).await;
                SendOutcome::Failed {
                    session_id,
                    error: e,
                }
            }
        };
        self.is_loading = false;
        outcome
    }
}
