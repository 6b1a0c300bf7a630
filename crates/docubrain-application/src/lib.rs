//! Application layer for DocuBrain.
//!
//! This crate provides the use case that drives a conversation: it owns the
//! input text and loading flag and coordinates the session manager with the
//! QA client.

pub mod chat_usecase;
pub mod input;

pub use chat_usecase::{ChatUseCase, PendingSend, SendOutcome};
pub use input::{Key, KeyPress};
