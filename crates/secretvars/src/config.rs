//! Configuration for secretvars
//!
//! [`StoreOptions`] controls how a store writes its file. [`Config`] is the
//! application-level file that picks the secrets location and carries the
//! store options.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths::Paths;

/// Name of the secrets file used when none is configured
pub const DEFAULT_STORE_NAME: &str = "secrets";

/// How a store persists its variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Write indented JSON instead of a single line
    pub pretty: bool,
    /// Create missing parent directories on save
    pub create_dirs: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            create_dirs: true,
        }
    }
}

/// secretvars configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Explicit secrets file, overrides the data directory default
    pub secrets_file: Option<PathBuf>,

    /// Options passed to the store
    pub store: StoreOptions,
}

impl Config {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Resolve the secrets file location
    pub fn secrets_path(&self, paths: &Paths) -> PathBuf {
        self.secrets_file
            .clone()
            .unwrap_or_else(|| paths.secrets_file(DEFAULT_STORE_NAME))
    }
}
