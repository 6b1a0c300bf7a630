//! In-memory session store.
//!
//! Keeps the serialized JSON string the way the browser's storage slot
//! would, so tests exercise the same encode/decode path as the file store.

use async_trait::async_trait;
use docubrain_core::error::Result;
use docubrain_core::session::{Session, SessionStore};
use std::sync::Mutex;
use tracing::warn;

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose slot already holds `raw`, valid JSON or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
            saves: Mutex::new(0),
        }
    }

    /// Current slot content.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().map(|slot| slot.clone()).unwrap_or_default()
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or_default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Vec<Session>>> {
        let Some(raw) = self.raw() else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(sessions) => Ok(Some(sessions)),
            Err(e) => {
                warn!("Discarding unreadable in-memory session history: {}", e);
                Ok(None)
            }
        }
    }

    async fn save(&self, sessions: &[Session]) -> Result<()> {
        let json = serde_json::to_string(sessions)?;
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(json);
        }
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }
}
