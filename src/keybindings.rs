//! Customizable keybindings for the labeling session.
//!
//! Arrow keys page through the deck, digit keys label the selection with the
//! class button at that slot, and an optional key triggers Skip/Remove Label.

use serde::{Deserialize, Serialize};

/// Keys the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Backspace,
    Delete,
    S,
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
}

/// What a bound key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Show the previous page
    PreviousPage,
    /// Show the next page
    NextPage,
    /// Press the Skip/Remove Label button
    Skip,
    /// Label the selection with the class at this layout index (0-based)
    LabelClass(usize),
}

/// Maximum number of classes that can have hotkeys (0-9 keys).
pub const MAX_CLASS_HOTKEYS: usize = 10;

/// Keybinding configuration for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Hotkey for the previous page
    pub previous_page: KeyCode,
    /// Hotkey for the next page
    pub next_page: KeyCode,
    /// Hotkey for the Skip/Remove Label button
    #[serde(default)]
    pub skip: Option<KeyCode>,

    /// Hotkeys for class buttons (indices 0-9 map to classes 1-10)
    /// None means no hotkey assigned for that slot
    #[serde(default = "default_class_hotkeys")]
    pub class_hotkeys: [Option<KeyCode>; MAX_CLASS_HOTKEYS],
}

fn default_class_hotkeys() -> [Option<KeyCode>; MAX_CLASS_HOTKEYS] {
    [
        Some(KeyCode::Key1),
        Some(KeyCode::Key2),
        Some(KeyCode::Key3),
        Some(KeyCode::Key4),
        Some(KeyCode::Key5),
        Some(KeyCode::Key6),
        Some(KeyCode::Key7),
        Some(KeyCode::Key8),
        Some(KeyCode::Key9),
        Some(KeyCode::Key0),
    ]
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            previous_page: KeyCode::ArrowLeft,
            next_page: KeyCode::ArrowRight,
            skip: Some(KeyCode::S),
            class_hotkeys: default_class_hotkeys(),
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action that corresponds to a key press, if any.
    pub fn action_for_key(&self, key: KeyCode) -> Option<KeyAction> {
        if key == self.previous_page {
            Some(KeyAction::PreviousPage)
        } else if key == self.next_page {
            Some(KeyAction::NextPage)
        } else if self.skip == Some(key) {
            Some(KeyAction::Skip)
        } else {
            self.class_index_for_key(key).map(KeyAction::LabelClass)
        }
    }

    /// Get the class index (0-based) that corresponds to a key press, if any.
    pub fn class_index_for_key(&self, key: KeyCode) -> Option<usize> {
        self.class_hotkeys
            .iter()
            .position(|hotkey| *hotkey == Some(key))
    }

    /// Get the hotkey for a class at a specific index, if any.
    pub fn key_for_class_index(&self, index: usize) -> Option<KeyCode> {
        self.class_hotkeys.get(index).copied().flatten()
    }

    /// Set the hotkey for a class index.
    pub fn set_class_key(&mut self, index: usize, key: Option<KeyCode>) {
        if index < MAX_CLASS_HOTKEYS {
            self.class_hotkeys[index] = key;
        }
    }

    /// Check if a key is already used by any binding.
    /// Returns a description of what it's used for, if anything.
    pub fn key_conflict(&self, key: KeyCode) -> Option<String> {
        match self.action_for_key(key)? {
            KeyAction::PreviousPage => Some("Previous page".to_string()),
            KeyAction::NextPage => Some("Next page".to_string()),
            KeyAction::Skip => Some("Skip".to_string()),
            KeyAction::LabelClass(index) => Some(format!("Class {}", index + 1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_actions() {
        let bindings = KeyBindings::new();
        assert_eq!(
            bindings.action_for_key(KeyCode::ArrowLeft),
            Some(KeyAction::PreviousPage)
        );
        assert_eq!(
            bindings.action_for_key(KeyCode::ArrowRight),
            Some(KeyAction::NextPage)
        );
        assert_eq!(bindings.action_for_key(KeyCode::S), Some(KeyAction::Skip));
        assert_eq!(
            bindings.action_for_key(KeyCode::Key1),
            Some(KeyAction::LabelClass(0))
        );
        assert_eq!(
            bindings.action_for_key(KeyCode::Key0),
            Some(KeyAction::LabelClass(9))
        );
        assert_eq!(bindings.action_for_key(KeyCode::Space), None);
    }

    #[test]
    fn test_rebind_class_key() {
        let mut bindings = KeyBindings::new();
        bindings.set_class_key(0, None);
        assert_eq!(bindings.action_for_key(KeyCode::Key1), None);
        bindings.set_class_key(0, Some(KeyCode::Space));
        assert_eq!(bindings.key_for_class_index(0), Some(KeyCode::Space));
        assert_eq!(bindings.key_conflict(KeyCode::Space), Some("Class 1".to_string()));
        // Out-of-range slots are ignored.
        bindings.set_class_key(MAX_CLASS_HOTKEYS, Some(KeyCode::Delete));
        assert_eq!(bindings.key_conflict(KeyCode::Delete), None);
    }
}
