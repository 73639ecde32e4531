//! Authoritative tile → label map.

use std::collections::HashMap;

use crate::constants::UNLABELED_SENTINEL;
use crate::model::TileKey;

/// Storage for the labels of every tile in the session.
///
/// An absent entry means the tile is unlabeled. The sentinel `"?"` and the
/// empty string are never stored; writing either clears the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelStore {
    labels: HashMap<TileKey, String>,
}

/// Check if a raw label value means "unlabeled".
pub fn is_unlabeled_value(label: &str) -> bool {
    label.is_empty() || label == UNLABELED_SENTINEL
}

impl LabelStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from persisted labels, dropping sentinel entries.
    pub fn from_labels<K, V>(labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<TileKey>,
        V: AsRef<str>,
    {
        let mut store = Self::new();
        for (key, label) in labels {
            store.set(&key.into(), label.as_ref());
        }
        store
    }

    /// Assign `label` to `key`, returning the previous label.
    ///
    /// An empty or sentinel label clears the entry instead.
    pub fn set(&mut self, key: &str, label: &str) -> Option<String> {
        if is_unlabeled_value(label) {
            return self.clear(key);
        }
        self.labels.insert(key.to_string(), label.to_string())
    }

    /// Remove the label of `key`, returning it.
    pub fn clear(&mut self, key: &str) -> Option<String> {
        self.labels.remove(key)
    }

    /// Get the label of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Check if `key` carries a label.
    pub fn is_labeled(&self, key: &str) -> bool {
        self.labels.contains_key(key)
    }

    /// Count entries whose label satisfies `predicate`.
    pub fn count(&self, predicate: impl Fn(&str) -> bool) -> usize {
        self.labels.values().filter(|label| predicate(label)).count()
    }

    /// Count tiles carrying any of `names`.
    pub fn count_with_any(&self, names: &[&str]) -> usize {
        self.count(|label| names.contains(&label))
    }

    /// Clear every entry labeled `name`, returning the cleared keys in order.
    pub fn clear_class(&mut self, name: &str) -> Vec<TileKey> {
        let mut cleared: Vec<TileKey> = self
            .labels
            .iter()
            .filter(|(_, label)| label.as_str() == name)
            .map(|(key, _)| key.clone())
            .collect();
        cleared.sort();
        for key in &cleared {
            self.labels.remove(key);
        }
        cleared
    }

    /// Iterate over all labeled tiles.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Get the number of labeled tiles.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if no tile is labeled.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
