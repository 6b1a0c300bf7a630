//! Session domain module.
//!
//! This module contains the chat session model, the pure transformations
//! over a session list, the store trait and the session manager.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`) and list transforms
//! - `message`: Message types (`MessageRole`, `Message`, `Source`)
//! - `repository`: Store trait for session persistence (`SessionStore`)
//! - `manager`: Session lifecycle management (`SessionManager`)

mod manager;
mod message;
mod model;
mod repository;

// Re-export public API
pub use manager::SessionManager;
pub use message::{APOLOGY, GREETING, Message, MessageRole, Source};
pub use model::{
    PLACEHOLDER_TITLE, Session, TITLE_ELLIPSIS, TITLE_MAX_CHARS, derive_title, update_session,
};
pub use repository::SessionStore;
