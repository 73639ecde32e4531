//! Tile data model.

use serde::{Deserialize, Serialize};

/// Opaque, immutable key addressing a tile.
pub type TileKey = String;

/// One labelable unit of the dataset.
///
/// A tile never carries its label; labels live in the label store so the
/// rendering data and the session state cannot diverge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Stable key of the tile
    pub key: TileKey,
    /// Position in the full, unfiltered dataset
    pub original_index: usize,
}

impl Tile {
    /// Create a new tile.
    pub fn new(key: impl Into<TileKey>, original_index: usize) -> Self {
        Self {
            key: key.into(),
            original_index,
        }
    }
}

/// The ordered tile keys a session is created from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Identifier used when broadcasting selections to linked views
    pub id: String,
    /// Tile keys in dataset order
    pub keys: Vec<TileKey>,
}

impl Dataset {
    /// Create a dataset from an id and ordered keys.
    pub fn new(id: impl Into<String>, keys: impl IntoIterator<Item = impl Into<TileKey>>) -> Self {
        Self {
            id: id.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}
