//! Configuration file support for labeling sessions.
//!
//! This module provides serialization and deserialization of session
//! settings: the built-in classes, coloring, paging and behavior toggles.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color_utils::from_hex;
use crate::constants::{DEFAULT_BUTTON_LIMIT, DEFAULT_PAGE_SIZE, DEFAULT_REDRAW_DEBOUNCE};
use crate::keybindings::KeyBindings;
use crate::model::{ClassRejection, check_class_name};
use crate::state::{ColorScheme, OverflowPolicy};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Settings a labeling session is created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Classes that are always available and cannot be removed
    #[serde(default)]
    pub builtin_classes: Vec<String>,

    /// Preset `#rrggbb` colors for classes, keyed by class name
    #[serde(default)]
    pub class_colors: BTreeMap<String, String>,

    /// How new classes get their color
    #[serde(default)]
    pub color_scheme: ColorScheme,

    /// Coloring of classes past the button limit
    #[serde(default)]
    pub overflow_policy: OverflowPolicy,

    /// Number of classes shown as buttons before the dropdown is used
    #[serde(default = "default_button_limit")]
    pub button_limit: usize,

    /// Tiles per page for renderers that take the page size from the config
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Select the next tile after labeling
    #[serde(default = "default_true")]
    pub auto_advance: bool,

    /// Hide the auto-advance toggle so the user cannot change it
    #[serde(default)]
    pub lock_auto_advance: bool,

    /// Only show tiles without a label
    #[serde(default)]
    pub show_unlabeled_only: bool,

    /// Hide the unlabeled-only toggle so the user cannot change it
    #[serde(default)]
    pub lock_show_unlabeled_only: bool,

    /// Never select tiles automatically
    #[serde(default)]
    pub hide_unselected: bool,

    /// Allow the user to add and remove classes
    #[serde(default = "default_true")]
    pub allow_class_creation: bool,

    /// Publish progress to the renderer
    #[serde(default = "default_true")]
    pub use_progress_bar: bool,

    /// Quiet period in milliseconds before re-initializing after page draws
    #[serde(default = "default_redraw_debounce_ms")]
    pub redraw_debounce_ms: u64,

    /// Keybinding configuration
    #[serde(default)]
    pub keybindings: KeyBindings,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_true() -> bool {
    true
}

fn default_button_limit() -> usize {
    DEFAULT_BUTTON_LIMIT
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_redraw_debounce_ms() -> u64 {
    DEFAULT_REDRAW_DEBOUNCE.as_millis() as u64
}

impl SessionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            builtin_classes: Vec::new(),
            class_colors: BTreeMap::new(),
            color_scheme: ColorScheme::default(),
            overflow_policy: OverflowPolicy::default(),
            button_limit: default_button_limit(),
            page_size: default_page_size(),
            auto_advance: true,
            lock_auto_advance: false,
            show_unlabeled_only: false,
            lock_show_unlabeled_only: false,
            hide_unselected: false,
            allow_class_creation: true,
            use_progress_bar: true,
            redraw_debounce_ms: default_redraw_debounce_ms(),
            keybindings: KeyBindings::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Create a configuration with the given built-in classes.
    pub fn with_classes<S: Into<String>>(classes: impl IntoIterator<Item = S>) -> Self {
        Self {
            builtin_classes: classes.into_iter().map(Into::into).collect(),
            ..Self::new()
        }
    }

    /// The redraw quiet period.
    pub fn redraw_debounce(&self) -> Duration {
        Duration::from_millis(self.redraw_debounce_ms)
    }

    /// Parsed preset color for `class`, if configured and valid.
    pub fn preset_color(&self, class: &str) -> Option<[u8; 3]> {
        let hex = self.class_colors.get(class)?;
        let color = from_hex(hex);
        if color.is_none() {
            log::warn!("Ignoring invalid color '{}' for class '{}'", hex, class);
        }
        color
    }

    /// Check the built-in class list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, name) in self.builtin_classes.iter().enumerate() {
            let reason = match check_class_name(name) {
                Err(reason) => Some(reason),
                Ok(()) if self.builtin_classes[..i].contains(name) => {
                    Some(ClassRejection::Duplicate)
                }
                Ok(()) => None,
            };
            if let Some(reason) = reason {
                return Err(ConfigError::InvalidClass {
                    name: name.clone(),
                    reason,
                });
            }
        }
        Ok(())
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "tilelab-config.json"
    }

    /// Get the default config file path for auto-load/save.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("tilelab").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("tilelab")
                    .join(Self::default_filename())
            })
        }
    }

    /// Read configuration from `path`.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Write configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path, returning where it went.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<std::path::PathBuf, ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save_to(&path)?;
        Ok(path)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A built-in class name breaks the naming rules
    #[error("Invalid built-in class '{name}': {reason}")]
    InvalidClass {
        name: String,
        reason: ClassRejection,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config = SessionConfig::from_json(r#"{ "version": 1 }"#).unwrap();
        assert!(config.auto_advance);
        assert!(config.allow_class_creation);
        assert_eq!(config.button_limit, DEFAULT_BUTTON_LIMIT);
        assert_eq!(config.redraw_debounce(), DEFAULT_REDRAW_DEBOUNCE);
        assert_eq!(config.color_scheme, ColorScheme::Master);
    }

    #[test]
    fn test_roundtrip() {
        let mut config = SessionConfig::with_classes(["Cat", "Dog"]);
        config.color_scheme = ColorScheme::GoldenAngle;
        config.class_colors.insert("Cat".into(), "#ff0000".into());
        let json = config.to_json().unwrap();
        let loaded = SessionConfig::from_json(&json).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.preset_color("Cat"), Some([255, 0, 0]));
        assert_eq!(loaded.preset_color("Dog"), None);
    }

    #[test]
    fn test_save_and_load_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(SessionConfig::default_filename());

        let mut config = SessionConfig::with_classes(["Cat"]);
        config.log_level = LogLevel::Debug;
        config.save_to(&path).unwrap();

        let loaded = SessionConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.log_level.name(), "Debug");
        assert!(matches!(
            SessionConfig::load_from(&temp_dir.path().join("missing.json")),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    fn test_version_too_new() {
        let json = format!(r#"{{ "version": {} }}"#, CONFIG_VERSION + 1);
        let err = SessionConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, ConfigError::VersionTooNew { .. }));
    }

    #[test]
    fn test_invalid_builtin_classes() {
        let err = SessionConfig::from_json(r#"{ "version": 1, "builtin_classes": ["Cat", "Skip"] }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidClass {
                reason: ClassRejection::Reserved,
                ..
            }
        ));
        let config = SessionConfig::with_classes(["Cat", "Cat"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidClass {
                reason: ClassRejection::Duplicate,
                ..
            })
        ));
    }
}
