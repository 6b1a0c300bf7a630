//! Session store trait.
//!
//! Defines the interface for the durable slot that holds the session list.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store for the serialized session list.
///
/// The whole list lives under one fixed key and is always written in full;
/// there are no per-session or incremental writes, and no schema version.
/// Injecting the store keeps [`SessionManager`](super::SessionManager)
/// independent of the storage mechanism (a JSON file, an in-memory fake).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Reads the stored session list.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(sessions))`: history found and parsed
    /// - `Ok(None)`: nothing stored, or the stored content could not be parsed
    /// - `Err(_)`: the slot itself could not be read
    async fn load(&self) -> Result<Option<Vec<Session>>>;

    /// Overwrites the stored list with `sessions`.
    async fn save(&self, sessions: &[Session]) -> Result<()>;
}
