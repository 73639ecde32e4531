//! Scenario tests for the labeling engine, driven through the headless renderer.


use crate::config::SessionConfig;
use crate::engine::LabelingEngine;
use crate::model::Dataset;
use crate::renderer::HeadlessRenderer;
use crate::session::SessionValue;

type Engine = LabelingEngine<HeadlessRenderer>;

/// Config with the given built-in classes and no redraw delay.
fn config(classes: &[&str]) -> SessionConfig {
    let mut config = SessionConfig::with_classes(classes.iter().copied());
    config.redraw_debounce_ms = 0;
    config
}

fn dataset(keys: &[&str]) -> Dataset {
    Dataset::new("tiles", keys.iter().copied())
}

/// Open a session and let the first draw settle.
fn open(config: SessionConfig, keys: &[&str], page_size: usize) -> Engine {
    let mut engine = LabelingEngine::init(
        config,
        Some(dataset(keys)),
        None,
        HeadlessRenderer::new(page_size),
    )
    .unwrap();
    settle(&mut engine);
    engine
}

/// Open a session restored from `initial`.
fn reopen(config: SessionConfig, keys: &[&str], initial: SessionValue, page_size: usize) -> Engine {
    let mut engine = LabelingEngine::init(
        config,
        Some(dataset(keys)),
        Some(initial),
        HeadlessRenderer::new(page_size),
    )
    .unwrap();
    settle(&mut engine);
    engine
}

/// Report every queued draw and run the debounced re-initialization.
fn settle(engine: &mut Engine) {
    while engine.renderer_mut().take_pending_draw() {
        engine.on_page_drawn();
    }
    engine.tick();
}

/// Replace the selection by clicking `keys`.
fn select_only(engine: &mut Engine, keys: &[&str]) {
    engine.clear_selection();
    for key in keys {
        engine.toggle_tile(key, true).unwrap();
    }
}
