//! Configuration service implementation.
//!
//! Loads `config.toml` (by default `~/.config/docubrain/config.toml`) and
//! collects the environment overrides that sit on top of it.

use crate::paths::DocubrainPaths;
use docubrain_core::config::{AppConfig, ConfigOverrides};
use docubrain_core::error::{DocubrainError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable holding the QA backend base URL.
pub const ENV_API_URL: &str = "DOCUBRAIN_API_URL";

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "DOCUBRAIN_DATA_DIR";

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Service for the platform config file location.
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(DocubrainPaths::config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config file.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read or parsed is a configuration error naming the path.
    pub fn load(&self) -> Result<AppConfig> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", self.path.display());
                return Ok(AppConfig::default());
            }
            Err(e) => {
                return Err(DocubrainError::config(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            DocubrainError::config(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        info!("Loaded config from {}", self.path.display());
        Ok(config)
    }

    /// Overrides taken from the process environment.
    pub fn env_overrides() -> ConfigOverrides {
        Self::overrides_from(|key| std::env::var(key).ok())
    }

    /// Overrides taken from an arbitrary variable lookup.
    pub fn overrides_from<F>(lookup: F) -> ConfigOverrides
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        ConfigOverrides {
            api_url: non_blank(ENV_API_URL),
            data_dir: non_blank(ENV_DATA_DIR).map(PathBuf::from),
        }
    }
}
