//! Interface to the external tile/grid renderer.
//!
//! The engine never touches the renderer's internals; it only issues the
//! commands below. The host feeds renderer events back through
//! [`crate::LabelingEngine::update`].

mod headless;

pub use headless::{Broadcast, HeadlessRenderer};

use serde::{Deserialize, Serialize};

use crate::color_utils::contrast_text_color;
use crate::constants::{DEFAULT_HEADER_COLOR, SKIP_HEADER_COLOR, SKIP_LABEL};
use crate::model::{LabelClass, TileKey};
use crate::state::{ClassLayout, PageInfo};

/// Header styling of a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileStyle {
    /// Header background
    pub background: [u8; 3],
    /// Header text color
    pub foreground: [u8; 3],
    /// Header text
    pub text: String,
}

impl TileStyle {
    /// Style of a tile labeled with a class of the given color.
    pub fn labeled(label: &str, color: [u8; 3]) -> Self {
        Self {
            background: color,
            foreground: contrast_text_color(color),
            text: label.to_string(),
        }
    }

    /// Style of a skipped tile.
    pub fn skipped() -> Self {
        Self::labeled(SKIP_LABEL, SKIP_HEADER_COLOR)
    }

    /// Style of a tile without a label.
    pub fn unlabeled() -> Self {
        Self {
            background: DEFAULT_HEADER_COLOR,
            foreground: contrast_text_color(DEFAULT_HEADER_COLOR),
            text: String::new(),
        }
    }
}

/// Labeling progress over the whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    /// Tiles carrying a class label or Skip
    pub labeled: usize,
    /// Tiles in the full, unfiltered dataset
    pub total: usize,
}

impl Progress {
    /// Fraction of labeled tiles (0.0-1.0); an empty dataset counts as done.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.labeled as f32 / self.total as f32
        }
    }

    /// Check if every tile is labeled.
    pub fn is_complete(&self) -> bool {
        self.labeled >= self.total
    }

    /// Text for the progress bar, like "3 / 15 labeled".
    pub fn text(&self) -> String {
        format!("{} / {} labeled", self.labeled, self.total)
    }
}

/// What the Skip button does for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipAction {
    /// Mark the selection as reviewed but unclassified
    Skip,
    /// Clear the labels of the selection
    RemoveLabel,
}

impl SkipAction {
    /// Button caption.
    pub fn caption(&self) -> &'static str {
        match self {
            SkipAction::Skip => "Skip",
            SkipAction::RemoveLabel => "Remove Label",
        }
    }
}

/// State of the Skip/Remove Label button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipButton {
    /// Shown only while something is selected
    pub visible: bool,
    /// What pressing it does
    pub action: SkipAction,
}

/// Toolbar state published after selection changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolbarState {
    /// Number of selected tiles
    pub selected: usize,
    /// Skip/Remove Label button
    pub skip: SkipButton,
}

/// Commands the engine issues to the tile/grid renderer.
pub trait TileRenderer {
    /// Paging of the currently shown tiles.
    fn page_info(&self) -> PageInfo;

    /// The page that is shown.
    fn current_page(&self) -> usize;

    /// Show `page`. The draw completes asynchronously and is reported back
    /// as a page-drawn event.
    fn navigate_to_page(&mut self, page: usize);

    /// Show exactly the eligible tiles, in order.
    fn show_tiles(&mut self, eligible: &[TileKey]);

    /// Select the cell at `offset` on the shown page. A selected cell stays
    /// selected. Returns false if there is no such cell.
    fn select_cell(&mut self, offset: usize) -> bool;

    /// Remove every cell highlight.
    fn clear_cell_selection(&mut self);

    /// Restyle the tile header of `key`. Returns false if the tile is not
    /// addressable.
    fn repaint_tile(&mut self, key: &str, style: &TileStyle) -> bool;

    /// Tell linked views about the selection. `additive` adds to their
    /// selection instead of replacing it.
    fn broadcast_row_selection(&mut self, dataset_id: &str, keys: &[TileKey], additive: bool);

    /// Update the progress bar.
    fn show_progress(&mut self, _progress: &Progress) {}

    /// Update the selected-tile counter and the Skip button.
    fn update_toolbar(&mut self, _toolbar: &ToolbarState) {}

    /// Rebuild the class buttons and dropdown.
    fn show_class_layout(&mut self, _layout: &ClassLayout, _classes: &[LabelClass]) {}

    /// Show a user-facing message.
    fn show_message(&mut self, _message: &str) {}
}
