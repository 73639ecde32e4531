//! Error types for labeling session operations.

use thiserror::Error;

use crate::model::ClassRejection;

/// Errors surfaced to the user by the labeling engine.
///
/// None of these are fatal; every rejection leaves the session unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The session was opened without a dataset
    #[error("Error: No data available")]
    NoDataset,

    /// The dataset lists the same key twice
    #[error("Duplicate tile key: {key}")]
    DuplicateTileKey {
        /// The repeated key
        key: String,
    },

    /// A new class name was refused
    #[error("Label '{name}' could not be added: {reason}")]
    ClassRejected {
        /// The refused name
        name: String,
        /// Why it was refused
        reason: ClassRejection,
    },

    /// Class creation is switched off by configuration
    #[error("Creating label classes is disabled")]
    ClassCreationDisabled,

    /// The referenced class is not registered
    #[error("Unknown label class: {name}")]
    UnknownClass {
        /// The unknown name
        name: String,
    },

    /// Built-in classes cannot be removed
    #[error("Label '{name}' was set in the configuration and cannot be removed")]
    BuiltinClass {
        /// The built-in class name
        name: String,
    },

    /// A label action was requested with nothing selected
    #[error("No tiles selected")]
    EmptySelection,

    /// The tile key is not part of the dataset
    #[error("Unknown tile: {key}")]
    UnknownTile {
        /// The unknown key
        key: String,
    },

    /// The tile exists but the active filter hides it
    #[error("Tile '{key}' is hidden by the current filter")]
    TileFilteredOut {
        /// The hidden key
        key: String,
    },

    /// The setting is fixed by configuration
    #[error("Setting '{setting}' is locked by the configuration")]
    SettingLocked {
        /// Name of the locked setting
        setting: &'static str,
    },
}

impl EngineError {
    /// Create a class rejection error.
    pub fn class_rejected(name: impl Into<String>, reason: ClassRejection) -> Self {
        Self::ClassRejected {
            name: name.into(),
            reason,
        }
    }

    /// Create an unknown class error.
    pub fn unknown_class(name: impl Into<String>) -> Self {
        Self::UnknownClass { name: name.into() }
    }

    /// Create a built-in class error.
    pub fn builtin_class(name: impl Into<String>) -> Self {
        Self::BuiltinClass { name: name.into() }
    }
}
