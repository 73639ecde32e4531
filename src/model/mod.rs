//! Data models for the labeling session.

mod label_class;
mod tile;

pub use label_class::{ClassOrigin, ClassRejection, LabelClass, check_class_name};
pub use tile::{Dataset, Tile, TileKey};
