//! Multi-select set of tiles queued for the next label action.

use std::collections::BTreeSet;

use crate::model::TileKey;

/// Tiles currently selected. Membership alone means "selected".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    keys: BTreeSet<TileKey>,
}

impl SelectionSet {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `key`. Returns false if it was already selected.
    pub fn insert(&mut self, key: &str) -> bool {
        self.keys.insert(key.to_string())
    }

    /// Deselect `key`. Returns false if it was not selected.
    pub fn remove(&mut self, key: &str) -> bool {
        self.keys.remove(key)
    }

    /// Check if `key` is selected.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Deselect everything, returning what was selected.
    pub fn clear(&mut self) -> Vec<TileKey> {
        std::mem::take(&mut self.keys).into_iter().collect()
    }

    /// Drop every key that is no longer eligible, returning the dropped keys.
    pub fn reconcile(&mut self, is_eligible: impl Fn(&str) -> bool) -> Vec<TileKey> {
        let dropped: Vec<TileKey> = self
            .keys
            .iter()
            .filter(|key| !is_eligible(key))
            .cloned()
            .collect();
        for key in &dropped {
            self.keys.remove(key);
        }
        if !dropped.is_empty() {
            log::debug!("Selection: dropped {} ineligible tiles", dropped.len());
        }
        dropped
    }

    /// Selected keys paired with their position, highest position first.
    ///
    /// Keys without a position are left out.
    pub fn by_position_desc(&self, position: impl Fn(&str) -> Option<usize>) -> Vec<(usize, &str)> {
        let mut ordered: Vec<(usize, &str)> = self
            .keys
            .iter()
            .filter_map(|key| position(key).map(|p| (p, key.as_str())))
            .collect();
        ordered.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        ordered
    }

    /// Iterate over the selected keys in key order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Selected keys, owned.
    pub fn to_vec(&self) -> Vec<TileKey> {
        self.keys.iter().cloned().collect()
    }

    /// Get the number of selected tiles.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let mut selection = SelectionSet::new();
        assert!(selection.insert("a"));
        assert!(!selection.insert("a"));
        assert!(selection.remove("a"));
        assert!(!selection.remove("a"));
        // Deselected keys leave nothing behind.
        assert!(selection.is_empty());
    }

    #[test]
    fn test_reconcile_drops_ineligible() {
        let mut selection = SelectionSet::new();
        selection.insert("a");
        selection.insert("b");
        selection.insert("c");
        let dropped = selection.reconcile(|key| key != "b");
        assert_eq!(dropped, vec!["b".to_string()]);
        assert_eq!(selection.to_vec(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_by_position_desc() {
        let mut selection = SelectionSet::new();
        selection.insert("a");
        selection.insert("c");
        selection.insert("x");
        let position = |key: &str| match key {
            "a" => Some(0),
            "c" => Some(2),
            _ => None,
        };
        assert_eq!(selection.by_position_desc(position), vec![(2, "c"), (0, "a")]);
    }
}
