//! Global constants for the labeling session

use std::time::Duration;

/// Label value that marks a tile as unlabeled in serialized session values.
pub const UNLABELED_SENTINEL: &str = "?";

/// Reserved pseudo-label for tiles that were reviewed but left unclassified.
pub const SKIP_LABEL: &str = "Skip";

/// Text of the shared action button next to the class dropdown.
pub const DROPDOWN_ACTION_LABEL: &str = "Label";

/// Number of classes shown as individual buttons before the rest collapse
/// into a dropdown.
pub const DEFAULT_BUTTON_LIMIT: usize = 7;

/// Quiet period after the last page-draw notification before the view is
/// re-initialized.
pub const DEFAULT_REDRAW_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Default number of tiles per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Header color of a tile that carries no label.
pub const DEFAULT_HEADER_COLOR: [u8; 3] = [0x40, 0x40, 0x40];

/// Header color of skipped tiles, also used as the neutral palette color.
pub const SKIP_HEADER_COLOR: [u8; 3] = [0x80, 0x80, 0x80];

/// Master palette assigned to classes by index.
pub const MASTER_PALETTE: [[u8; 3]; 7] = [
    [0x1F, 0x78, 0xB4],
    [0x33, 0xA0, 0x2C],
    [0xE3, 0x1A, 0x1C],
    [0xFF, 0x7F, 0x00],
    [0x6A, 0x3D, 0x9A],
    [0xA6, 0xCE, 0xE3],
    [0xB2, 0xDF, 0x8A],
];

/// Golden angle in degrees, used to spread generated hues.
pub const GOLDEN_ANGLE: f32 = 137.5;
