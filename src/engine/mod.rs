//! The labeling session engine.
//!
//! [`LabelingEngine`] owns the labels, the class registry, the palette, the
//! filter view and the selection of one session. It commands a
//! [`TileRenderer`] and is driven through [`SessionMessage`]s or the
//! matching `on_*` methods.

mod handlers;

#[cfg(test)]
mod tests;

pub use handlers::{LabelOutcome, RemovalOutcome};

use web_time::Instant;

use crate::config::SessionConfig;
use crate::constants::{SKIP_LABEL, UNLABELED_SENTINEL};
use crate::error::EngineError;
use crate::message::SessionMessage;
use crate::model::{ClassOrigin, ClassRejection, Dataset, LabelClass, TileKey};
use crate::renderer::{Progress, SkipAction, SkipButton, TileRenderer, TileStyle, ToolbarState};
use crate::session::SessionValue;
use crate::state::{
    ClassLayout, ClassRegistry, FilterPredicate, FilterView, LabelPalette, LabelStore,
    PageCursor, RedrawDebouncer, SelectionSet,
};

/// A labeling session bound to one renderer.
pub struct LabelingEngine<R: TileRenderer> {
    config: SessionConfig,
    dataset_id: String,
    renderer: R,
    labels: LabelStore,
    classes: ClassRegistry,
    palette: LabelPalette,
    filter: FilterView,
    selection: SelectionSet,
    cursor: PageCursor,
    redraw: RedrawDebouncer,
    auto_advance: bool,
    /// The first re-initialization after opening is still due
    opening: bool,
    /// The session reopened on a saved page
    resumed: bool,
}

/// Add a class, binding its color only if the name is accepted.
fn register_class(
    classes: &mut ClassRegistry,
    palette: &mut LabelPalette,
    name: &str,
    origin: ClassOrigin,
) -> Result<LabelClass, ClassRejection> {
    classes.check_new(name)?;
    let color = palette.color_for(name, classes.len());
    classes.add(name, color, origin).cloned()
}

impl<R: TileRenderer> LabelingEngine<R> {
    /// Open a session over `dataset`, restoring `initial` if given.
    ///
    /// Fails with [`EngineError::NoDataset`] when there is nothing to label;
    /// the error is also shown through the renderer.
    pub fn init(
        config: SessionConfig,
        dataset: Option<Dataset>,
        initial: Option<SessionValue>,
        mut renderer: R,
    ) -> Result<Self, EngineError> {
        let Some(dataset) = dataset else {
            let err = EngineError::NoDataset;
            log::error!("{}", err);
            renderer.show_message(&err.to_string());
            return Err(err);
        };
        let mut filter =
            FilterView::new(&dataset.keys).inspect_err(|e| renderer.show_message(&e.to_string()))?;

        let initial = initial.unwrap_or_default();

        // Restored colors first, then configured presets
        let mut palette = LabelPalette::new(
            config.color_scheme,
            config.overflow_policy,
            config.button_limit,
        );
        for (name, color) in &initial.colors {
            palette.bind(name, *color);
        }
        for name in config.class_colors.keys() {
            if let Some(color) = config.preset_color(name) {
                palette.bind(name, color);
            }
        }

        let mut classes = ClassRegistry::new();
        for name in &config.builtin_classes {
            register_class(&mut classes, &mut palette, name, ClassOrigin::Builtin)
                .map_err(|reason| EngineError::class_rejected(name.as_str(), reason))
                .inspect_err(|e| renderer.show_message(&e.to_string()))?;
        }
        for name in &initial.possible_classes {
            if classes.contains(name) {
                continue;
            }
            if let Err(reason) =
                register_class(&mut classes, &mut palette, name, ClassOrigin::UserCreated)
            {
                log::warn!("Dropping restored class '{}': {}", name, reason);
            }
        }

        let mut labels = LabelStore::new();
        for (key, label) in initial.assigned_labels() {
            if !filter.contains(key) {
                log::warn!("Dropping label of unknown tile '{}'", key);
                continue;
            }
            if label != SKIP_LABEL && !classes.contains(label) {
                match register_class(&mut classes, &mut palette, label, ClassOrigin::UserCreated) {
                    Ok(_) => log::info!("Registered class '{}' found in stored labels", label),
                    Err(reason) => {
                        log::warn!("Dropping label '{}' of tile '{}': {}", label, key, reason);
                        continue;
                    }
                }
            }
            labels.set(key, label);
        }

        let auto_advance = initial
            .auto_advance
            .filter(|_| !config.lock_auto_advance)
            .unwrap_or(config.auto_advance);
        let show_unlabeled_only = initial
            .show_unlabeled_only
            .filter(|_| !config.lock_show_unlabeled_only)
            .unwrap_or(config.show_unlabeled_only);
        filter.apply(
            FilterPredicate {
                unlabeled_only: show_unlabeled_only,
                ..FilterPredicate::default()
            },
            &labels,
        );

        let mut selection = SelectionSet::new();
        for key in &initial.selection {
            if filter.is_eligible(key) {
                selection.insert(key);
            }
        }

        let redraw = RedrawDebouncer::new(config.redraw_debounce());
        let mut engine = Self {
            dataset_id: dataset.id,
            renderer,
            labels,
            classes,
            palette,
            filter,
            selection,
            cursor: PageCursor::new(0),
            redraw,
            auto_advance,
            opening: true,
            resumed: false,
            config,
        };

        engine.show_eligible();
        let saved_page = initial.current_page;
        if saved_page > 0 {
            if saved_page < engine.renderer.page_info().page_count {
                engine.renderer.navigate_to_page(saved_page);
                engine.resumed = true;
            } else {
                log::debug!("Saved page {} no longer exists", saved_page);
            }
        }
        engine.cursor.set_current_page(engine.renderer.current_page());

        engine.publish_layout();
        engine.publish_progress();
        engine.publish_toolbar();

        log::info!(
            "Session '{}' opened: {} tiles, {} classes ({} colors), {} labeled",
            engine.dataset_id,
            engine.filter.total(),
            engine.classes.len(),
            engine.config.color_scheme.name(),
            engine.labels.len()
        );
        Ok(engine)
    }

    /// Process a message.
    pub fn update(&mut self, message: SessionMessage) -> Result<(), EngineError> {
        log::trace!("Message: {:?}", message);
        match message {
            SessionMessage::ToggleTile { key, selected } => self.toggle_tile(&key, selected),
            SessionMessage::ClearSelection => {
                self.clear_selection();
                Ok(())
            }
            SessionMessage::SelectionChanged { change } => {
                self.on_selection_changed(change);
                Ok(())
            }
            SessionMessage::LabelButtonClicked { class } => {
                self.on_label_button_clicked(&class).map(|_| ())
            }
            SessionMessage::SkipClicked => self.on_skip_clicked().map(|_| ()),
            SessionMessage::KeyPressed { key } => self.on_key_pressed(key),
            SessionMessage::AddClass { name } => self.on_add_class(&name).map(|_| ()),
            SessionMessage::RemoveClasses { names } => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                self.on_remove_classes(&names).map(|_| ())
            }
            SessionMessage::SetAutoAdvance { enabled } => self.set_auto_advance(enabled),
            SessionMessage::SetShowUnlabeledOnly { enabled } => {
                self.set_show_unlabeled_only(enabled)
            }
            SessionMessage::SetSearchTerm { term } => {
                self.set_search_term(term);
                Ok(())
            }
            SessionMessage::FilterChanged {
                included,
                reevaluate,
            } => {
                self.on_filter_changed(included, reevaluate);
                Ok(())
            }
            SessionMessage::PageDrawn => {
                self.on_page_drawn();
                Ok(())
            }
            SessionMessage::Tick => {
                self.tick();
                Ok(())
            }
        }
    }

    /// Run the debounced re-initialization if its quiet period has passed.
    ///
    /// Returns whether it ran.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// [`Self::tick`] with an explicit clock.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if !self.redraw.take_due_at(now) {
            return false;
        }
        self.reinitialize();
        true
    }

    // Accessors

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Id of the dataset being labeled.
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The renderer, mutably, for driving renderer-side events.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Label of a tile.
    pub fn label_of(&self, key: &str) -> Option<&str> {
        self.labels.get(key)
    }

    /// All labels.
    pub fn labels(&self) -> &LabelStore {
        &self.labels
    }

    /// The class registry.
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Color bound to a class.
    pub fn class_color(&self, name: &str) -> Option<[u8; 3]> {
        self.palette.get(name)
    }

    /// Selected tiles.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Tiles passing the current filter, in dataset order.
    pub fn eligible(&self) -> Vec<TileKey> {
        self.filter.eligible_sequence()
    }

    /// The active filter.
    pub fn predicate(&self) -> &FilterPredicate {
        self.filter.predicate()
    }

    /// Check if auto-advance is on.
    pub fn is_auto_advance(&self) -> bool {
        self.auto_advance
    }

    /// Check if the unlabeled-only filter is on.
    pub fn is_show_unlabeled_only(&self) -> bool {
        self.filter.predicate().unlabeled_only
    }

    /// Check if a page draw is waiting for its quiet period.
    pub fn is_redraw_pending(&self) -> bool {
        self.redraw.is_armed()
    }

    /// Labeling progress over the whole dataset.
    pub fn progress(&self) -> Progress {
        Progress {
            labeled: self.labels.count(|label| self.classes.recognizes(label)),
            total: self.filter.total(),
        }
    }

    /// State of the Skip/Remove Label button.
    pub fn skip_button(&self) -> SkipButton {
        let any_labeled = self.selection.iter().any(|key| self.labels.is_labeled(key));
        SkipButton {
            visible: !self.selection.is_empty(),
            action: if any_labeled {
                SkipAction::RemoveLabel
            } else {
                SkipAction::Skip
            },
        }
    }

    /// Split of the classes into buttons and dropdown.
    pub fn class_layout(&self) -> ClassLayout {
        self.classes.layout(self.config.button_limit)
    }

    /// Snapshot of the session for the host to persist.
    pub fn session_value(&self) -> SessionValue {
        let labels = self
            .filter
            .tiles()
            .iter()
            .map(|tile| {
                let label = self.labels.get(&tile.key).unwrap_or(UNLABELED_SENTINEL);
                (tile.key.clone(), label.to_string())
            })
            .collect();
        SessionValue {
            labels,
            possible_classes: self.classes.names(),
            colors: self
                .classes
                .iter()
                .map(|class| (class.name.clone(), class.color))
                .collect(),
            selection: self.selection.to_vec(),
            current_page: self.cursor.current_page(),
            auto_advance: Some(self.auto_advance),
            show_unlabeled_only: Some(self.is_show_unlabeled_only()),
        }
    }

    /// Check the session value before the host accepts it.
    ///
    /// Every state the engine can reach is valid.
    pub fn validate(&self) -> bool {
        true
    }

    // Renderer updates

    fn style_for(&mut self, label: Option<&str>) -> TileStyle {
        match label {
            None => TileStyle::unlabeled(),
            Some(SKIP_LABEL) => TileStyle::skipped(),
            Some(name) => {
                let index = self.classes.index_of(name).unwrap_or(self.classes.len());
                TileStyle::labeled(name, self.palette.color_for(name, index))
            }
        }
    }

    fn repaint(&mut self, key: &str) -> bool {
        let label = self.labels.get(key).map(str::to_string);
        let style = self.style_for(label.as_deref());
        let painted = self.renderer.repaint_tile(key, &style);
        if !painted {
            log::warn!("Tile '{}' is not addressable; skipped repaint", key);
        }
        painted
    }

    /// Repaint every labeled eligible tile.
    fn repaint_labeled(&mut self) {
        let keys: Vec<TileKey> = self
            .filter
            .eligible_keys()
            .filter(|key| self.labels.is_labeled(key))
            .map(str::to_string)
            .collect();
        for key in &keys {
            self.repaint(key);
        }
        log::debug!("Repainted {} labeled tiles", keys.len());
    }

    fn show_eligible(&mut self) {
        let eligible = self.filter.eligible_sequence();
        self.renderer.show_tiles(&eligible);
        self.redraw.view_changed();
        self.cursor.set_current_page(self.renderer.current_page());
    }

    /// Make the cell highlights of the shown page match the selection.
    fn highlight_selection(&mut self) {
        let page = self.renderer.current_page();
        let info = self.renderer.page_info();
        let filter = &self.filter;
        let offsets: Vec<usize> = self
            .selection
            .iter()
            .filter_map(|key| filter.position_of(key))
            .filter_map(|position| info.locate(position))
            .filter(|address| address.page == page)
            .map(|address| address.offset)
            .collect();

        self.renderer.clear_cell_selection();
        for &offset in &offsets {
            if !self.renderer.select_cell(offset) {
                log::debug!("No cell at offset {} on page {}", offset, page);
            }
        }
    }

    fn broadcast(&mut self, keys: &[TileKey], additive: bool) {
        self.renderer
            .broadcast_row_selection(&self.dataset_id, keys, additive);
    }

    fn publish_progress(&mut self) {
        if !self.config.use_progress_bar {
            return;
        }
        let progress = self.progress();
        self.renderer.show_progress(&progress);
    }

    fn publish_toolbar(&mut self) {
        let toolbar = ToolbarState {
            selected: self.selection.len(),
            skip: self.skip_button(),
        };
        self.renderer.update_toolbar(&toolbar);
    }

    fn publish_layout(&mut self) {
        let layout = self.class_layout();
        let classes: Vec<LabelClass> = self.classes.iter().cloned().collect();
        self.renderer.show_class_layout(&layout, &classes);
    }

    /// Show a rejection to the user and hand it back.
    fn reject(&mut self, err: EngineError) -> EngineError {
        log::debug!("Rejected: {}", err);
        self.renderer.show_message(&err.to_string());
        err
    }
}
