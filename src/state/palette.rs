//! Label class → color assignment.
//!
//! Colors are bound lazily the first time a class needs one and never change
//! afterwards, so tiles painted earlier stay correct without repainting.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color_utils::{hsv_to_rgb, rgb_to_u8, to_hex};
use crate::constants::{GOLDEN_ANGLE, MASTER_PALETTE, SKIP_HEADER_COLOR};

/// Neutral color used by the `None` scheme and by overflow classes.
pub const NEUTRAL_COLOR: [u8; 3] = SKIP_HEADER_COLOR;

/// How new classes get their color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Every class is painted with the neutral gray
    None,
    /// Fixed seven-color master palette, cycled by class index
    #[default]
    Master,
    /// Hues spread by the golden angle
    GoldenAngle,
}

impl ColorScheme {
    /// Get the display name for this scheme.
    pub fn name(&self) -> &'static str {
        match self {
            ColorScheme::None => "None",
            ColorScheme::Master => "Scheme 1",
            ColorScheme::GoldenAngle => "Golden angle",
        }
    }
}

/// What happens to classes past the on-screen button limit.
///
/// Past the limit classes are picked from a dropdown, where the button color
/// carries no meaning; `Neutral` reflects that, `Cycle` keeps coloring them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Collapse every overflow class onto the neutral color
    #[default]
    Neutral,
    /// Keep assigning scheme colors
    Cycle,
}

/// Maps label class names to colors.
#[derive(Debug, Clone)]
pub struct LabelPalette {
    scheme: ColorScheme,
    overflow: OverflowPolicy,
    button_limit: usize,
    bindings: HashMap<String, [u8; 3]>,
}

impl LabelPalette {
    /// Create a palette with no bindings.
    pub fn new(scheme: ColorScheme, overflow: OverflowPolicy, button_limit: usize) -> Self {
        Self {
            scheme,
            overflow,
            button_limit,
            bindings: HashMap::new(),
        }
    }

    /// Bind a preset color. Existing bindings win; returns whether it was bound.
    pub fn bind(&mut self, class: &str, color: [u8; 3]) -> bool {
        if self.bindings.contains_key(class) {
            return false;
        }
        self.bindings.insert(class.to_string(), color);
        true
    }

    /// Get the bound color of `class`, if any.
    pub fn get(&self, class: &str) -> Option<[u8; 3]> {
        self.bindings.get(class).copied()
    }

    /// Get the color of `class`, binding one if it has none yet.
    ///
    /// `index` is the class position in the registry and only matters for
    /// the first call.
    pub fn color_for(&mut self, class: &str, index: usize) -> [u8; 3] {
        if let Some(color) = self.get(class) {
            return color;
        }
        let color = self.next_color(index);
        log::debug!(
            "Palette: bound '{}' (index {}) to {}",
            class,
            index,
            to_hex(color)
        );
        self.bindings.insert(class.to_string(), color);
        color
    }

    fn next_color(&self, index: usize) -> [u8; 3] {
        if self.scheme == ColorScheme::None {
            return NEUTRAL_COLOR;
        }
        if index >= self.button_limit && self.overflow == OverflowPolicy::Neutral {
            return NEUTRAL_COLOR;
        }
        match self.scheme {
            ColorScheme::None => NEUTRAL_COLOR,
            ColorScheme::Master => {
                let preferred = MASTER_PALETTE[index % MASTER_PALETTE.len()];
                if !self.is_taken(preferred) {
                    return preferred;
                }
                MASTER_PALETTE
                    .iter()
                    .copied()
                    .find(|color| !self.is_taken(*color))
                    .unwrap_or(preferred)
            }
            ColorScheme::GoldenAngle => {
                let hue = (index as f32 * GOLDEN_ANGLE) % 360.0;
                rgb_to_u8(hsv_to_rgb(hue, 0.7, 0.9))
            }
        }
    }

    fn is_taken(&self, color: [u8; 3]) -> bool {
        self.bindings.values().any(|bound| *bound == color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> LabelPalette {
        LabelPalette::new(ColorScheme::Master, OverflowPolicy::Neutral, 7)
    }

    #[test]
    fn test_master_colors_by_index() {
        let mut palette = master();
        assert_eq!(palette.color_for("Cat", 0), MASTER_PALETTE[0]);
        assert_eq!(palette.color_for("Dog", 1), MASTER_PALETTE[1]);
    }

    #[test]
    fn test_binding_is_stable() {
        let mut palette = master();
        let first = palette.color_for("Cat", 0);
        // A later call with a different index must not move the binding.
        assert_eq!(palette.color_for("Cat", 5), first);
        palette.color_for("Dog", 1);
        assert_eq!(palette.color_for("Cat", 0), first);
    }

    #[test]
    fn test_overflow_collapses_to_neutral() {
        let mut palette = master();
        assert_eq!(palette.color_for("Eighth", 7), NEUTRAL_COLOR);
        assert_eq!(palette.color_for("Ninth", 8), NEUTRAL_COLOR);
    }

    #[test]
    fn test_overflow_cycle_policy() {
        let mut palette = LabelPalette::new(ColorScheme::Master, OverflowPolicy::Cycle, 7);
        assert_eq!(palette.color_for("Eighth", 7), MASTER_PALETTE[0]);
    }

    #[test]
    fn test_none_scheme_is_neutral() {
        let mut palette = LabelPalette::new(ColorScheme::None, OverflowPolicy::Cycle, 7);
        assert_eq!(palette.color_for("Cat", 0), NEUTRAL_COLOR);
    }

    #[test]
    fn test_taken_master_color_is_not_reused() {
        let mut palette = master();
        palette.color_for("A", 0);
        palette.color_for("B", 1);
        palette.color_for("C", 2);
        // "B" was removed from the registry, so "D" lands on index 2 again.
        let d = palette.color_for("D", 2);
        assert_ne!(d, palette.color_for("C", 2));
        assert_eq!(d, MASTER_PALETTE[3]);
    }

    #[test]
    fn test_preset_binding_wins() {
        let mut palette = master();
        assert!(palette.bind("Cat", [1, 2, 3]));
        assert!(!palette.bind("Cat", [4, 5, 6]));
        assert_eq!(palette.color_for("Cat", 0), [1, 2, 3]);
    }

    #[test]
    fn test_golden_angle_distinct() {
        let mut palette = LabelPalette::new(ColorScheme::GoldenAngle, OverflowPolicy::Cycle, 7);
        let a = palette.color_for("A", 1);
        let b = palette.color_for("B", 2);
        assert_ne!(a, b);
    }
}
