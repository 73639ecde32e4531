//! Session message types.
//!
//! Every user action and renderer event reaches the engine as a message, so
//! a host can drive a session from its own event loop or replay a recorded
//! script.

use serde::{Deserialize, Serialize};

use crate::keybindings::KeyCode;
use crate::model::TileKey;

/// Selection change reported by a linked view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionChange {
    /// Keys added to the selection
    Added(Vec<TileKey>),
    /// Keys removed from the selection
    Removed(Vec<TileKey>),
    /// The selection was replaced
    Replaced(Vec<TileKey>),
}

/// Messages that update a labeling session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionMessage {
    // Tiles
    /// A tile was clicked on or off
    ToggleTile { key: TileKey, selected: bool },
    /// The clear-selection button was pressed
    ClearSelection,
    /// A linked view changed the selection
    SelectionChanged { change: SelectionChange },

    // Labeling
    /// A class button or dropdown entry was pressed
    LabelButtonClicked { class: String },
    /// The Skip/Remove Label button was pressed
    SkipClicked,
    /// A key was pressed
    KeyPressed { key: KeyCode },

    // Class editor
    /// Add a class
    AddClass { name: String },
    /// Remove classes and clear their labels
    RemoveClasses { names: Vec<String> },

    // Toggles and filters
    /// Auto-advance toggled
    SetAutoAdvance { enabled: bool },
    /// Unlabeled-only toggled
    SetShowUnlabeledOnly { enabled: bool },
    /// Search term edited
    SetSearchTerm { term: Option<String> },
    /// The external filter changed
    FilterChanged {
        included: Option<Vec<TileKey>>,
        #[serde(default)]
        reevaluate: bool,
    },

    // Renderer
    /// The renderer finished drawing a page
    PageDrawn,
    /// Timer tick
    Tick,
}
