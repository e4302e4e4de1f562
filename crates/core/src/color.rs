//! Hex color parsing for effect configuration.
//!
//! Effects take their tint as a `"#rrggbb"` string and upload it as a
//! normalized RGB triple.

use crate::error::FxError;
use glam::Vec3;

/// Color used by the plasma when its configured hex string is malformed.
pub const FALLBACK_RGB: Vec3 = Vec3::new(1.0, 0.5, 0.2);

/// Parses a hex color string like "#b19eef" or "b19eef" (case insensitive)
/// into components in [0, 1].
///
/// Returns `FxError::InvalidColor` if the input is not a 6-digit hex color.
pub fn hex_to_rgb(hex: &str) -> Result<Vec3, FxError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FxError::InvalidColor(format!(
            "expected 6 hex digits in {hex:?}"
        )));
    }
    let channel = |range: std::ops::Range<usize>, name: &str| {
        u8::from_str_radix(&digits[range], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|e| FxError::InvalidColor(format!("invalid {name} component: {e}")))
    };
    Ok(Vec3::new(
        channel(0..2, "red")?,
        channel(2..4, "green")?,
        channel(4..6, "blue")?,
    ))
}

/// Like [`hex_to_rgb`], but logs and substitutes [`FALLBACK_RGB`] on failure.
pub fn hex_to_rgb_or_fallback(hex: &str) -> Vec3 {
    hex_to_rgb(hex).unwrap_or_else(|e| {
        log::warn!("{e}; using fallback color");
        FALLBACK_RGB
    })
}
