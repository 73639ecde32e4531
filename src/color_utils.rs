//! Color utility functions shared across the session engine.
//!
//! This module provides color conversion and contrast helpers
//! used by the palette and the tile styling code.

/// Convert HSV to RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (0-360)
/// * `s` - Saturation (0.0-1.0)
/// * `v` - Value/brightness (0.0-1.0)
///
/// # Returns
/// RGB tuple with values in range 0.0-1.0
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

/// Convert a unit-range RGB tuple to 8-bit channels.
pub fn rgb_to_u8((r, g, b): (f32, f32, f32)) -> [u8; 3] {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(r), channel(g), channel(b)]
}

/// Perceptual luminance in range 0.0-1.0.
pub fn luminance(color: [u8; 3]) -> f32 {
    let [r, g, b] = color.map(f32::from);
    (0.299 * r + 0.587 * g + 0.114 * b) / 255.0
}

/// Pick black or white text for the best contrast on `background`.
pub fn contrast_text_color(background: [u8; 3]) -> [u8; 3] {
    if luminance(background) > 0.5 {
        [0, 0, 0]
    } else {
        [255, 255, 255]
    }
}

/// Format a color as `#rrggbb`.
pub fn to_hex(color: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Parse `#rrggbb` (the leading `#` is optional).
pub fn from_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}
