//! Unified path management for DocuBrain files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/docubrain/              # Config directory
//! └── config.toml                   # Application configuration
//!
//! ~/.local/share/docubrain/         # Data directory (overridable)
//! ├── docubrain_sessions.json       # Session history
//! └── logs/                         # Application logs
//!     └── docubrain.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "docubrain";
const CONFIG_FILE: &str = "config.toml";
const SESSIONS_FILE: &str = "docubrain_sessions.json";
const LOGS_DIR: &str = "logs";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for docubrain_core::DocubrainError {
    fn from(e: PathError) -> Self {
        docubrain_core::DocubrainError::config(e.to_string())
    }
}

/// Resolves where DocuBrain keeps its files.
pub struct DocubrainPaths;

impl DocubrainPaths {
    /// Returns the config directory (e.g., `~/.config/docubrain/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the default data directory (e.g., `~/.local/share/docubrain/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Returns `data_dir` if given, otherwise the platform data directory.
    pub fn resolve_data_dir(data_dir: Option<&Path>) -> Result<PathBuf, PathError> {
        match data_dir {
            Some(dir) => Ok(dir.to_path_buf()),
            None => Self::data_dir(),
        }
    }

    /// Session history file inside `data_dir`.
    pub fn sessions_file_in(data_dir: &Path) -> PathBuf {
        data_dir.join(SESSIONS_FILE)
    }

    /// Log directory inside `data_dir`.
    pub fn logs_dir_in(data_dir: &Path) -> PathBuf {
        data_dir.join(LOGS_DIR)
    }
}
