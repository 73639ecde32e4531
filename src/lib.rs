//! tilelab - Tile Labeling Sessions
//!
//! A session engine for labeling a dataset of tiles shown in a paged grid:
//! the user selects tiles, assigns a class (or skips them), and the engine
//! keeps labels, class colors, filters and selection consistent with an
//! external renderer.

pub mod color_utils;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod keybindings;
pub mod message;
pub mod model;
pub mod renderer;
pub mod session;
pub mod state;

pub use config::{ConfigError, LogLevel, SessionConfig};
pub use engine::{LabelOutcome, LabelingEngine, RemovalOutcome};
pub use error::EngineError;
pub use message::{SelectionChange, SessionMessage};
pub use model::{Dataset, LabelClass, TileKey};
pub use renderer::{HeadlessRenderer, Progress, TileRenderer, TileStyle};
pub use session::{SessionError, SessionFile, SessionValue};
