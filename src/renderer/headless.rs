//! In-memory renderer used by the command-line driver and the tests.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use super::{Progress, TileRenderer, TileStyle, ToolbarState};
use crate::model::{LabelClass, TileKey};
use crate::state::{ClassLayout, PageInfo};

/// A selection broadcast sent to linked views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Broadcast {
    /// Dataset the keys belong to
    pub dataset_id: String,
    /// Broadcast keys
    pub keys: Vec<TileKey>,
    /// Added to the linked selection instead of replacing it
    pub additive: bool,
}

/// Renderer that keeps the grid in memory.
///
/// Page draws are queued instead of happening asynchronously; the host
/// drains them with [`HeadlessRenderer::take_pending_draw`] and reports each
/// one to the engine as a page-drawn event.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    page_size: usize,
    shown: Vec<TileKey>,
    current_page: usize,
    styles: HashMap<TileKey, TileStyle>,
    highlighted: BTreeSet<TileKey>,
    unreachable: HashSet<TileKey>,
    pending_draws: usize,
    repaints: usize,
    broadcasts: Vec<Broadcast>,
    messages: Vec<String>,
    progress: Option<Progress>,
    toolbar: Option<ToolbarState>,
    layout: Option<ClassLayout>,
}

impl HeadlessRenderer {
    /// Create a renderer showing `page_size` tiles per page.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// Consume one queued page draw.
    pub fn take_pending_draw(&mut self) -> bool {
        if self.pending_draws == 0 {
            return false;
        }
        self.pending_draws -= 1;
        true
    }

    /// Make a tile unaddressable, as if its cell had been detached.
    pub fn detach(&mut self, key: &str) {
        self.unreachable.insert(key.to_string());
    }

    /// Shown tiles, in order.
    pub fn shown(&self) -> &[TileKey] {
        &self.shown
    }

    /// Tiles on the current page.
    pub fn page_keys(&self) -> &[TileKey] {
        let start = (self.current_page * self.page_size).min(self.shown.len());
        let end = (start + self.page_size).min(self.shown.len());
        &self.shown[start..end]
    }

    /// Header style of a tile, if it has been painted.
    pub fn style_of(&self, key: &str) -> Option<&TileStyle> {
        self.styles.get(key)
    }

    /// Number of successful tile repaints.
    pub fn repaint_count(&self) -> usize {
        self.repaints
    }

    /// Check if a cell is highlighted.
    pub fn is_highlighted(&self, key: &str) -> bool {
        self.highlighted.contains(key)
    }

    /// All broadcasts sent so far.
    pub fn broadcasts(&self) -> &[Broadcast] {
        &self.broadcasts
    }

    /// The most recent broadcast.
    pub fn last_broadcast(&self) -> Option<&Broadcast> {
        self.broadcasts.last()
    }

    /// Messages shown to the user.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Last published progress.
    pub fn progress(&self) -> Option<Progress> {
        self.progress
    }

    /// Last published toolbar state.
    pub fn toolbar(&self) -> Option<ToolbarState> {
        self.toolbar
    }

    /// Last published class layout.
    pub fn layout(&self) -> Option<&ClassLayout> {
        self.layout.as_ref()
    }

    fn is_addressable(&self, key: &str) -> bool {
        !self.unreachable.contains(key) && self.shown.iter().any(|k| k == key)
    }
}

impl TileRenderer for HeadlessRenderer {
    fn page_info(&self) -> PageInfo {
        PageInfo::for_records(self.page_size, self.shown.len())
    }

    fn current_page(&self) -> usize {
        self.current_page
    }

    fn navigate_to_page(&mut self, page: usize) {
        let info = self.page_info();
        if page >= info.page_count && page != 0 {
            log::debug!("Headless: page {} out of range ({} pages)", page, info.page_count);
            return;
        }
        self.current_page = page;
        self.pending_draws += 1;
    }

    fn show_tiles(&mut self, eligible: &[TileKey]) {
        self.shown = eligible.to_vec();
        self.current_page = 0;
        let shown = &self.shown;
        self.highlighted.retain(|key| shown.contains(key));
        self.pending_draws += 1;
    }

    fn select_cell(&mut self, offset: usize) -> bool {
        if offset >= self.page_size {
            return false;
        }
        let Some(key) = self.page_keys().get(offset).cloned() else {
            return false;
        };
        if self.unreachable.contains(&key) {
            return false;
        }
        self.highlighted.insert(key);
        true
    }

    fn clear_cell_selection(&mut self) {
        self.highlighted.clear();
    }

    fn repaint_tile(&mut self, key: &str, style: &TileStyle) -> bool {
        if !self.is_addressable(key) {
            return false;
        }
        self.styles.insert(key.to_string(), style.clone());
        self.repaints += 1;
        true
    }

    fn broadcast_row_selection(&mut self, dataset_id: &str, keys: &[TileKey], additive: bool) {
        self.broadcasts.push(Broadcast {
            dataset_id: dataset_id.to_string(),
            keys: keys.to_vec(),
            additive,
        });
    }

    fn show_progress(&mut self, progress: &Progress) {
        self.progress = Some(*progress);
    }

    fn update_toolbar(&mut self, toolbar: &ToolbarState) {
        self.toolbar = Some(*toolbar);
    }

    fn show_class_layout(&mut self, layout: &ClassLayout, _classes: &[LabelClass]) {
        self.layout = Some(layout.clone());
    }

    fn show_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<TileKey> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_paging_and_selection() {
        let mut renderer = HeadlessRenderer::new(2);
        renderer.show_tiles(&keys(&["a", "b", "c"]));
        assert!(renderer.take_pending_draw());
        assert!(!renderer.take_pending_draw());
        assert_eq!(renderer.page_info().page_count, 2);

        renderer.navigate_to_page(1);
        assert_eq!(renderer.page_keys(), &keys(&["c"])[..]);
        assert!(renderer.select_cell(0));
        assert!(!renderer.select_cell(1));
        assert!(renderer.is_highlighted("c"));

        // Out-of-range pages are ignored.
        renderer.navigate_to_page(5);
        assert_eq!(renderer.current_page(), 1);
    }

    #[test]
    fn test_repaint_requires_addressable_tile() {
        let mut renderer = HeadlessRenderer::new(2);
        renderer.show_tiles(&keys(&["a", "b"]));
        assert!(renderer.repaint_tile("a", &TileStyle::skipped()));
        assert!(!renderer.repaint_tile("zzz", &TileStyle::skipped()));
        renderer.detach("b");
        assert!(!renderer.repaint_tile("b", &TileStyle::skipped()));
        assert_eq!(renderer.style_of("a").map(|s| s.text.as_str()), Some("Skip"));
        assert_eq!(renderer.repaint_count(), 1);
    }
}
