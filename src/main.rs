//! Command-line driver for labeling sessions.
//!
//! Opens a session file in the headless renderer, replays an optional
//! script of session messages and prints the resulting session value.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use tilelab::{
    HeadlessRenderer, LabelingEngine, SessionConfig, SessionError, SessionFile, SessionMessage,
};

type Engine = LabelingEngine<HeadlessRenderer>;

/// Replay a labeling session against the in-memory renderer.
#[derive(Parser)]
#[command(name = "tilelab")]
#[command(about = "Replay a tile labeling session and print its value", long_about = None)]
#[command(version)]
struct Args {
    /// Session file with the dataset, an optional config and snapshot
    session: PathBuf,

    /// JSON array of session messages to replay
    script: Option<PathBuf>,

    /// Store the effective config as the user default
    #[arg(long)]
    save_config: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let file = match SessionFile::load(&args.session) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to load {}: {}", args.session.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let config = file
        .config
        .or_else(SessionConfig::load_from_default_path)
        .unwrap_or_default();

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();
    log::debug!("Log level: {}", config.log_level.name());

    if args.save_config {
        match config.save_to_default_path() {
            Ok(path) => eprintln!("Saved config to {}", path.display()),
            Err(e) => {
                eprintln!("Failed to save config: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let script = match args.script.as_deref().map(read_script).transpose() {
        Ok(script) => script.unwrap_or_default(),
        Err(e) => {
            eprintln!("Failed to load script: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let renderer = HeadlessRenderer::new(config.page_size);
    let mut engine = match LabelingEngine::init(config, file.dataset, file.session, renderer) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    settle(&mut engine);

    for message in script {
        if let Err(e) = engine.update(message) {
            log::warn!("{}", e);
        }
        settle(&mut engine);
    }

    let progress = engine.progress();
    log::info!(
        "{} ({:.0}%{})",
        progress.text(),
        progress.fraction() * 100.0,
        if progress.is_complete() { ", complete" } else { "" }
    );
    match engine.session_value().to_json() {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to write session value: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn read_script(path: &Path) -> Result<Vec<SessionMessage>, SessionError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Report queued page draws and wait out the redraw quiet period.
fn settle(engine: &mut Engine) {
    let mut drawn = false;
    while engine.renderer_mut().take_pending_draw() {
        engine.on_page_drawn();
        drawn = true;
    }
    if drawn {
        std::thread::sleep(engine.config().redraw_debounce());
        engine.tick();
    }
}
