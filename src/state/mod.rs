//! Session state owned by the labeling engine.

mod classes;
mod filter;
mod label_store;
mod page_cursor;
mod palette;
mod redraw;
mod selection;

pub use classes::{ClassLayout, ClassRegistry};
pub use filter::{FilterPredicate, FilterView};
pub use label_store::{LabelStore, is_unlabeled_value};
pub use page_cursor::{
    AdvanceMode, CellAddress, CursorStep, PageCursor, PageInfo, PendingSelection, next_position,
};
pub use palette::{ColorScheme, LabelPalette, NEUTRAL_COLOR, OverflowPolicy};
pub use redraw::RedrawDebouncer;
pub use selection::SelectionSet;
