//! JSON file implementation of the session store.

use crate::paths::DocubrainPaths;
use crate::storage::{AtomicJsonError, AtomicJsonFile};
use async_trait::async_trait;
use docubrain_core::error::{DocubrainError, Result};
use docubrain_core::session::{Session, SessionStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Stores the session list as one JSON array in a single file.
///
/// The file plays the part of the browser's fixed storage key: every save
/// replaces it whole, and content that does not parse is treated as if no
/// history existed.
#[derive(Clone)]
pub struct JsonFileSessionStore {
    file: Arc<AtomicJsonFile<Vec<Session>>>,
}

impl JsonFileSessionStore {
    /// Creates a store backed by `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    /// Creates a store at `<data_dir>/docubrain_sessions.json`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(DocubrainPaths::sessions_file_in(data_dir))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn load(&self) -> Result<Option<Vec<Session>>> {
        let file = self.file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| DocubrainError::internal(format!("Failed to join task: {}", e)))?;

        match loaded {
            Ok(Some(sessions)) => Ok(Some(sessions)),
            Ok(None) => {
                debug!("No session history at {}", self.path().display());
                Ok(None)
            }
            Err(AtomicJsonError::JsonError(e)) => {
                warn!(
                    "Discarding unreadable session history at {}: {}",
                    self.path().display(),
                    e
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, sessions: &[Session]) -> Result<()> {
        let file = self.file.clone();
        let sessions = sessions.to_vec();
        tokio::task::spawn_blocking(move || file.save(&sessions))
            .await
            .map_err(|e| DocubrainError::internal(format!("Failed to join task: {}", e)))??;
        Ok(())
    }
}
