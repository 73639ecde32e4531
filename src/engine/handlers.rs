//! Event handlers of the labeling engine.
//!
//! Each handler processes one user action or renderer event and leaves the
//! renderer in sync with the session state.

use std::collections::HashSet;

use web_time::Instant;

use super::{LabelingEngine, register_class};
use crate::color_utils::to_hex;
use crate::constants::SKIP_LABEL;
use crate::error::EngineError;
use crate::keybindings::{KeyAction, KeyCode};
use crate::message::SelectionChange;
use crate::model::{ClassOrigin, LabelClass, TileKey};
use crate::renderer::{SkipAction, TileRenderer};
use crate::state::{AdvanceMode, CursorStep, FilterPredicate, is_unlabeled_value, next_position};

/// Result of a label, skip or remove-label action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelOutcome {
    /// Tiles whose label was written or cleared, highest position first
    pub labeled: Vec<TileKey>,
    /// Selected tiles that were not eligible and were left untouched
    pub skipped: Vec<TileKey>,
    /// Tile selected by auto-advance
    pub next: Option<TileKey>,
}

/// Result of removing classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalOutcome {
    /// Removed classes
    pub removed: Vec<LabelClass>,
    /// Tiles whose label was cleared
    pub cleared: Vec<TileKey>,
}

impl<R: TileRenderer> LabelingEngine<R> {
    // Selection

    /// Select or deselect a tile the user clicked.
    pub fn toggle_tile(&mut self, key: &str, selected: bool) -> Result<(), EngineError> {
        if !self.filter.contains(key) {
            return Err(self.reject(EngineError::UnknownTile {
                key: key.to_string(),
            }));
        }
        if !self.filter.is_eligible(key) {
            return Err(self.reject(EngineError::TileFilteredOut {
                key: key.to_string(),
            }));
        }
        if selected {
            if self.selection.insert(key) {
                self.broadcast(&[key.to_string()], true);
            }
        } else if self.selection.remove(key) {
            let remaining = self.selection.to_vec();
            self.broadcast(&remaining, false);
        }
        self.publish_toolbar();
        Ok(())
    }

    /// Deselect every tile.
    pub fn clear_selection(&mut self) {
        let cleared = self.selection.clear();
        self.renderer.clear_cell_selection();
        if !cleared.is_empty() {
            log::debug!("Selection: cleared {} tiles", cleared.len());
            self.broadcast(&[], false);
        }
        self.publish_toolbar();
    }

    /// Follow a selection change made in a linked view.
    ///
    /// Only eligible keys are taken over; nothing is broadcast back.
    pub fn on_selection_changed(&mut self, change: SelectionChange) {
        let ignored = match change {
            SelectionChange::Added(keys) => self.adopt(&keys),
            SelectionChange::Removed(keys) => {
                for key in &keys {
                    self.selection.remove(key);
                }
                0
            }
            SelectionChange::Replaced(keys) => {
                self.selection.clear();
                self.adopt(&keys)
            }
        };
        if ignored > 0 {
            log::debug!("Selection: ignored {} ineligible linked keys", ignored);
        }
        self.highlight_selection();
        self.publish_toolbar();
    }

    /// Select the eligible keys, returning how many were not.
    fn adopt(&mut self, keys: &[TileKey]) -> usize {
        let mut ignored = 0;
        for key in keys {
            if self.filter.is_eligible(key) {
                self.selection.insert(key);
            } else {
                ignored += 1;
            }
        }
        ignored
    }

    // Labeling

    /// Label the selection with a registered class.
    pub fn on_label_button_clicked(&mut self, class: &str) -> Result<LabelOutcome, EngineError> {
        if !self.classes.contains(class) {
            return Err(self.reject(EngineError::unknown_class(class)));
        }
        self.apply_label(class)
    }

    /// Press the Skip/Remove Label button.
    pub fn on_skip_clicked(&mut self) -> Result<LabelOutcome, EngineError> {
        let action = self.skip_button().action;
        log::debug!("'{}' pressed", action.caption());
        match action {
            SkipAction::Skip => self.apply_label(SKIP_LABEL),
            SkipAction::RemoveLabel => self.apply_label(""),
        }
    }

    /// Write `label` to every selected tile.
    ///
    /// An empty label (or `"?"`) clears the selected tiles. The selection is
    /// consumed; with auto-advance on, the next tile gets selected.
    pub fn apply_label(&mut self, label: &str) -> Result<LabelOutcome, EngineError> {
        if self.selection.is_empty() {
            return Err(self.reject(EngineError::EmptySelection));
        }
        let label = (!is_unlabeled_value(label)).then_some(label);
        if let Some(name) = label.filter(|name| *name != SKIP_LABEL && !self.classes.contains(name)) {
            return Err(self.reject(EngineError::unknown_class(name)));
        }

        let filter = &self.filter;
        let ordered: Vec<TileKey> = self
            .selection
            .by_position_desc(|key| filter.position_of(key))
            .into_iter()
            .map(|(_, key)| key.to_string())
            .collect();
        let skipped: Vec<TileKey> = self
            .selection
            .iter()
            .filter(|key| !filter.is_eligible(key))
            .map(str::to_string)
            .collect();
        for key in &skipped {
            log::warn!("Tile '{}' is not shown; left as is", key);
        }

        let style = self.style_for(label);
        let mut furthest = None;
        for key in &ordered {
            match label {
                Some(name) => self.labels.set(key, name),
                None => self.labels.clear(key),
            };
            if !self.renderer.repaint_tile(key, &style) {
                log::warn!("Tile '{}' is not addressable; label kept without repaint", key);
            }
            furthest = furthest.max(self.filter.original_index(key));
        }
        log::info!(
            "Labeled {} tiles as '{}'",
            ordered.len(),
            label.unwrap_or_default()
        );

        self.selection.clear();
        self.renderer.clear_cell_selection();
        if self.filter.predicate().depends_on_labels() && self.filter.refresh(&self.labels) {
            self.show_eligible();
        }
        self.publish_progress();

        let next = match (label, furthest) {
            (Some(_), Some(index)) => {
                // The labeled tiles may have left the view; continue after
                // the last tile that is still shown before them.
                let last: Vec<usize> = self.filter.anchor_position(index).into_iter().collect();
                self.advance_after_labeling(&last)
            }
            _ => None,
        };
        if next.is_none() {
            self.broadcast(&[], false);
        }
        self.publish_toolbar();

        Ok(LabelOutcome {
            labeled: ordered,
            skipped,
            next,
        })
    }

    /// Select the tile after the furthest of `last_positions`.
    ///
    /// Returns `None` when auto-advance is off, nothing is eligible or the
    /// renderer has no cell for the tile.
    pub fn advance_after_labeling(&mut self, last_positions: &[usize]) -> Option<TileKey> {
        if !self.auto_advance || self.config.hide_unselected {
            return None;
        }
        self.advance(last_positions, false)
    }

    fn advance(&mut self, last_positions: &[usize], initializing: bool) -> Option<TileKey> {
        let mode = AdvanceMode {
            initializing,
            unlabeled_only: self.filter.predicate().unlabeled_only,
        };
        let position = next_position(last_positions, self.filter.len(), mode)?;
        let key = self.filter.key_at(position)?.to_string();
        let Some(address) = self.renderer.page_info().locate(position) else {
            log::debug!("Advance: renderer has no cell for position {}", position);
            return None;
        };

        match self
            .cursor
            .plan(&key, address, self.renderer.current_page())
        {
            CursorStep::SelectNow(address) => {
                if !self.renderer.select_cell(address.offset) {
                    log::warn!("Advance: no cell at offset {} for '{}'", address.offset, key);
                    return None;
                }
            }
            CursorStep::Navigate(page) => {
                log::debug!("Advance: '{}' is on page {}", key, page);
                self.renderer.navigate_to_page(page);
            }
        }

        self.selection.insert(&key);
        self.broadcast(std::slice::from_ref(&key), false);
        log::debug!("Advance: selected '{}' at position {}", key, position);
        Some(key)
    }

    /// Handle a key press.
    pub fn on_key_pressed(&mut self, key: KeyCode) -> Result<(), EngineError> {
        let Some(action) = self.config.keybindings.action_for_key(key) else {
            log::trace!("Unbound key {:?}", key);
            return Ok(());
        };
        match action {
            KeyAction::PreviousPage => {
                let page = self.cursor.previous_page();
                self.go_to_page(page);
                Ok(())
            }
            KeyAction::NextPage => {
                let page = self.cursor.next_page(&self.renderer.page_info());
                self.go_to_page(page);
                Ok(())
            }
            KeyAction::Skip => self.on_skip_clicked().map(|_| ()),
            KeyAction::LabelClass(index) => match self.class_layout().buttons.get(index).cloned() {
                Some(class) => self.on_label_button_clicked(&class).map(|_| ()),
                None => Ok(()),
            },
        }
    }

    fn go_to_page(&mut self, page: usize) {
        if page == self.renderer.current_page() {
            return;
        }
        self.renderer.navigate_to_page(page);
        self.cursor.set_current_page(self.renderer.current_page());
    }

    // Classes

    /// Add a user-created class.
    pub fn on_add_class(&mut self, name: &str) -> Result<LabelClass, EngineError> {
        if !self.config.allow_class_creation {
            return Err(self.reject(EngineError::ClassCreationDisabled));
        }
        let class = match register_class(
            &mut self.classes,
            &mut self.palette,
            name,
            ClassOrigin::UserCreated,
        ) {
            Ok(class) => class,
            Err(reason) => return Err(self.reject(EngineError::class_rejected(name, reason))),
        };
        log::info!("Added class '{}' ({})", class.name, to_hex(class.color));
        self.publish_layout();
        Ok(class)
    }

    /// Number of tiles labeled with any of `names`.
    pub fn removal_impact(&self, names: &[&str]) -> usize {
        self.labels.count_with_any(names)
    }

    /// Remove user-created classes and clear their labels.
    pub fn on_remove_classes(&mut self, names: &[&str]) -> Result<RemovalOutcome, EngineError> {
        if !self.config.allow_class_creation {
            return Err(self.reject(EngineError::ClassCreationDisabled));
        }
        let removed = match self.classes.remove(names) {
            Ok(removed) => removed,
            Err(err) => return Err(self.reject(err)),
        };

        let mut cleared = Vec::new();
        for class in &removed {
            cleared.extend(self.labels.clear_class(&class.name));
        }
        cleared.sort();
        log::info!(
            "Removed {} classes, cleared {} labels",
            removed.len(),
            cleared.len()
        );

        self.refilter(None);
        for key in &cleared {
            if self.filter.is_eligible(key) {
                self.repaint(key);
            }
        }
        self.publish_layout();
        self.publish_progress();
        Ok(RemovalOutcome { removed, cleared })
    }

    // Toggles and filters

    /// Turn auto-advance on or off.
    pub fn set_auto_advance(&mut self, enabled: bool) -> Result<(), EngineError> {
        if self.config.lock_auto_advance {
            return Err(self.reject(EngineError::SettingLocked {
                setting: "auto_advance",
            }));
        }
        self.auto_advance = enabled;
        log::debug!("Auto-advance: {}", enabled);
        Ok(())
    }

    /// Show only unlabeled tiles, or all of them.
    pub fn set_show_unlabeled_only(&mut self, enabled: bool) -> Result<(), EngineError> {
        if self.config.lock_show_unlabeled_only {
            return Err(self.reject(EngineError::SettingLocked {
                setting: "show_unlabeled_only",
            }));
        }
        let predicate = FilterPredicate {
            unlabeled_only: enabled,
            ..self.filter.predicate().clone()
        };
        self.refilter(Some(predicate));
        Ok(())
    }

    /// Filter tiles by a substring of their label.
    pub fn set_search_term(&mut self, term: Option<String>) {
        let predicate = FilterPredicate {
            search_term: term,
            ..self.filter.predicate().clone()
        };
        self.refilter(Some(predicate));
    }

    /// Follow a filter change made in a linked view.
    ///
    /// `included` lists the tiles the linked filter keeps; `None` lifts it.
    /// Unless `reevaluate` is set the labeled tiles are repainted right away.
    pub fn on_filter_changed(&mut self, included: Option<Vec<TileKey>>, reevaluate: bool) {
        let predicate = FilterPredicate {
            external: included.map(|keys| keys.into_iter().collect::<HashSet<_>>()),
            ..self.filter.predicate().clone()
        };
        self.refilter(Some(predicate));
        if reevaluate {
            self.redraw.invalidate();
        } else {
            self.repaint_labeled();
            self.redraw.mark_initialized(self.renderer.current_page());
        }
    }

    /// Re-apply the filter, dropping tiles that left it from the selection.
    fn refilter(&mut self, predicate: Option<FilterPredicate>) {
        let changed = match predicate {
            Some(predicate) => self.filter.apply(predicate, &self.labels),
            None => self.filter.refresh(&self.labels),
        };
        let filter = &self.filter;
        self.selection.reconcile(|key| filter.is_eligible(key));
        if changed {
            log::debug!("Filter: {} of {} tiles shown", self.filter.len(), self.filter.total());
            self.show_eligible();
        }
        self.publish_toolbar();
    }

    // Renderer events

    /// Note that the renderer finished drawing a page.
    pub fn on_page_drawn(&mut self) {
        self.on_page_drawn_at(Instant::now());
    }

    /// [`Self::on_page_drawn`] with an explicit clock.
    pub fn on_page_drawn_at(&mut self, now: Instant) {
        self.cursor.set_current_page(self.renderer.current_page());
        self.redraw.notify_at(now);
    }

    /// Debounced work once the renderer has settled on a page.
    pub(super) fn reinitialize(&mut self) {
        let shown_page = self.renderer.current_page();
        if !self.redraw.is_initialized_for(shown_page) {
            self.repaint_labeled();
            self.redraw.mark_initialized(shown_page);
        }

        if let Some(pending) = self.cursor.take_pending_for(shown_page) {
            if self.renderer.select_cell(pending.address.offset) {
                log::debug!("Selected deferred tile '{}'", pending.key);
            } else {
                log::warn!(
                    "Deferred tile '{}' has no cell on page {}; deselecting",
                    pending.key,
                    shown_page
                );
                self.selection.remove(&pending.key);
                let remaining = self.selection.to_vec();
                self.broadcast(&remaining, false);
            }
        } else if let Some(pending) = self.cursor.cancel_pending() {
            log::debug!(
                "Page {} shown instead of {}; dropped deferred click on '{}'",
                shown_page,
                pending.address.page,
                pending.key
            );
        }

        if self.opening {
            self.opening = false;
            if self.resumed {
                log::debug!("Resumed on page {}", shown_page);
            } else if self.auto_advance && !self.config.hide_unselected && self.selection.is_empty()
            {
                self.advance(&[], true);
            }
        }
        self.highlight_selection();
        self.publish_toolbar();
    }
}
