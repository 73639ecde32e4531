//! Filter/search view over the ordered tile keys.
//!
//! The eligible sequence is stored as ascending dataset indices, which keeps
//! it a strict order-preserving subsequence of the full key order and lets
//! positions be found with a binary search.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{Tile, TileKey};
use crate::state::LabelStore;

/// The active filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPredicate {
    /// Only keep tiles without a label
    pub unlabeled_only: bool,
    /// Literal, case-sensitive substring of the label text
    pub search_term: Option<String>,
    /// Keys included by a linked view's filter; `None` means no such filter
    #[serde(skip)]
    pub external: Option<HashSet<TileKey>>,
}

impl FilterPredicate {
    /// The search term, if it is set and non-empty.
    pub fn search(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|term| !term.is_empty())
    }

    /// Check if labeling a tile can change its eligibility.
    pub fn depends_on_labels(&self) -> bool {
        self.unlabeled_only || self.search().is_some()
    }

    /// Check a single tile against the predicate.
    pub fn matches(&self, key: &str, label: Option<&str>) -> bool {
        if self
            .external
            .as_ref()
            .is_some_and(|external| !external.contains(key))
        {
            return false;
        }
        if self.unlabeled_only && label.is_some() {
            return false;
        }
        match self.search() {
            Some(term) => label.unwrap_or_default().contains(term),
            None => true,
        }
    }
}

/// Derives the eligible ordered subsequence of tiles.
#[derive(Debug, Clone)]
pub struct FilterView {
    tiles: Vec<Tile>,
    index: HashMap<TileKey, usize>,
    predicate: FilterPredicate,
    eligible: Vec<usize>,
}

impl FilterView {
    /// Create a view over `keys` with no filter applied.
    pub fn new(keys: &[TileKey]) -> Result<Self, EngineError> {
        let mut index = HashMap::with_capacity(keys.len());
        let mut tiles = Vec::with_capacity(keys.len());
        for (i, key) in keys.iter().enumerate() {
            if index.insert(key.clone(), i).is_some() {
                return Err(EngineError::DuplicateTileKey { key: key.clone() });
            }
            tiles.push(Tile::new(key.clone(), i));
        }
        Ok(Self {
            eligible: (0..tiles.len()).collect(),
            tiles,
            index,
            predicate: FilterPredicate::default(),
        })
    }

    /// The active predicate.
    pub fn predicate(&self) -> &FilterPredicate {
        &self.predicate
    }

    /// Replace the predicate and re-derive the sequence.
    ///
    /// Returns whether the eligible sequence changed.
    pub fn apply(&mut self, predicate: FilterPredicate, labels: &LabelStore) -> bool {
        self.predicate = predicate;
        self.refresh(labels)
    }

    /// Re-derive the sequence with the current predicate.
    pub fn refresh(&mut self, labels: &LabelStore) -> bool {
        let eligible: Vec<usize> = self
            .tiles
            .iter()
            .filter(|tile| self.predicate.matches(&tile.key, labels.get(&tile.key)))
            .map(|tile| tile.original_index)
            .collect();
        let changed = eligible != self.eligible;
        if changed {
            log::debug!(
                "Filter: {} of {} tiles eligible",
                eligible.len(),
                self.tiles.len()
            );
        }
        self.eligible = eligible;
        changed
    }

    /// Eligible keys in order.
    pub fn eligible_keys(&self) -> impl Iterator<Item = &str> {
        self.eligible.iter().map(|&i| self.tiles[i].key.as_str())
    }

    /// Eligible keys in order, owned.
    pub fn eligible_sequence(&self) -> Vec<TileKey> {
        self.eligible_keys().map(str::to_string).collect()
    }

    /// Key at an eligible position.
    pub fn key_at(&self, position: usize) -> Option<&str> {
        self.eligible
            .get(position)
            .map(|&i| self.tiles[i].key.as_str())
    }

    /// Position of `key` in the eligible sequence.
    pub fn position_of(&self, key: &str) -> Option<usize> {
        let original = self.original_index(key)?;
        self.eligible.binary_search(&original).ok()
    }

    /// Check if `key` is currently eligible.
    pub fn is_eligible(&self, key: &str) -> bool {
        self.position_of(key).is_some()
    }

    /// Dataset index of `key`.
    pub fn original_index(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Check if `key` belongs to the dataset.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Position of the last eligible tile at or before `original_index`.
    ///
    /// For an eligible tile this is its own position; for a tile that has
    /// dropped out it is the position of its nearest eligible predecessor.
    pub fn anchor_position(&self, original_index: usize) -> Option<usize> {
        self.eligible
            .partition_point(|&i| i <= original_index)
            .checked_sub(1)
    }

    /// All tiles in dataset order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of eligible tiles.
    pub fn len(&self) -> usize {
        self.eligible.len()
    }

    /// Check if no tile is eligible.
    pub fn is_empty(&self) -> bool {
        self.eligible.is_empty()
    }

    /// Number of tiles in the full dataset.
    pub fn total(&self) -> usize {
        self.tiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<TileKey> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn view() -> FilterView {
        FilterView::new(&keys(&["a", "b", "c", "d"])).unwrap()
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let err = FilterView::new(&keys(&["a", "b", "a"])).unwrap_err();
        assert_eq!(err, EngineError::DuplicateTileKey { key: "a".into() });
    }

    #[test]
    fn test_unlabeled_only() {
        let mut view = view();
        let labels = LabelStore::from_labels([("b", "Cat")]);
        let predicate = FilterPredicate {
            unlabeled_only: true,
            ..Default::default()
        };
        view.apply(predicate, &labels);
        assert_eq!(view.eligible_sequence(), keys(&["a", "c", "d"]));
        assert_eq!(view.position_of("c"), Some(1));
        assert_eq!(view.position_of("b"), None);
    }

    #[test]
    fn test_search_is_literal_and_case_sensitive() {
        let mut view = view();
        let labels = LabelStore::from_labels([("a", "Cat"), ("b", "cat"), ("c", "C.t")]);
        let predicate = FilterPredicate {
            search_term: Some("C.t".into()),
            ..Default::default()
        };
        view.apply(predicate, &labels);
        assert_eq!(view.eligible_sequence(), keys(&["c"]));
    }

    #[test]
    fn test_empty_search_keeps_everything() {
        let mut view = view();
        let predicate = FilterPredicate {
            search_term: Some(String::new()),
            ..Default::default()
        };
        view.apply(predicate, &LabelStore::new());
        assert_eq!(view.len(), 4);
        assert!(!view.predicate().depends_on_labels());
    }

    #[test]
    fn test_external_filter() {
        let mut view = view();
        let predicate = FilterPredicate {
            external: Some(["b", "d"].iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        };
        view.apply(predicate, &LabelStore::new());
        assert_eq!(view.eligible_sequence(), keys(&["b", "d"]));
    }

    #[test]
    fn test_reapply_is_idempotent() {
        let mut view = view();
        let labels = LabelStore::from_labels([("a", "Cat")]);
        let predicate = FilterPredicate {
            unlabeled_only: true,
            ..Default::default()
        };
        assert!(view.apply(predicate.clone(), &labels));
        let first = view.eligible_sequence();
        assert!(!view.apply(predicate, &labels));
        assert_eq!(view.eligible_sequence(), first);
    }

    #[test]
    fn test_anchor_position() {
        let mut view = view();
        let labels = LabelStore::from_labels([("b", "Cat"), ("a", "Dog")]);
        let predicate = FilterPredicate {
            unlabeled_only: true,
            ..Default::default()
        };
        view.apply(predicate, &labels);
        // eligible: c(2), d(3)
        assert_eq!(view.anchor_position(0), None);
        assert_eq!(view.anchor_position(1), None);
        assert_eq!(view.anchor_position(2), Some(0));
        assert_eq!(view.anchor_position(3), Some(1));
    }
}
