//! Serializable session snapshot.
//!
//! The snapshot is what the host persists between sessions. Unlabeled tiles
//! are written with the `"?"` sentinel so every dataset key is present;
//! reading a snapshot turns the sentinel back into "no label".

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SessionConfig;
use crate::model::{Dataset, TileKey};
use crate::state::is_unlabeled_value;

/// Errors that can occur while reading or writing session files.
#[derive(Error, Debug)]
pub enum SessionError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration embedded in the file is invalid
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// The session value exposed to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionValue {
    /// Label of every tile, `"?"` for unlabeled ones
    #[serde(default)]
    pub labels: BTreeMap<TileKey, String>,
    /// All label classes in order, built-ins first
    #[serde(default)]
    pub possible_classes: Vec<String>,
    /// Color bound to each class
    #[serde(default)]
    pub colors: BTreeMap<String, [u8; 3]>,
    /// Selected tiles
    #[serde(default)]
    pub selection: Vec<TileKey>,
    /// Page the session was on
    #[serde(default)]
    pub current_page: usize,
    /// Auto-advance toggle; the configured value applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_advance: Option<bool>,
    /// Unlabeled-only toggle; the configured value applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_unlabeled_only: Option<bool>,
}

impl SessionValue {
    /// Labels that carry a value, skipping sentinel entries.
    pub fn assigned_labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels
            .iter()
            .filter(|(_, label)| !is_unlabeled_value(label))
            .map(|(key, label)| (key.as_str(), label.as_str()))
    }

    /// Export to a pretty JSON string.
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Import from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Everything needed to open a session from disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionFile {
    /// Tiles to label
    pub dataset: Option<Dataset>,
    /// Session settings; the default config is used when absent
    #[serde(default)]
    pub config: Option<SessionConfig>,
    /// Snapshot of a previous session
    #[serde(default)]
    pub session: Option<SessionValue>,
}

impl SessionFile {
    /// Read a session file.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path)?;
        let file: Self = serde_json::from_str(&json)?;
        if let Some(config) = &file.config {
            config.validate()?;
        }
        log::info!("Loaded session file {:?}", path);
        Ok(file)
    }
}
