//! Host-space to Spine-space coordinate conversion.
//!
//! Host pixel space has Y increasing downward; Spine space has Y
//! increasing upward. Offsets compose additively down the bone chain, so
//! every conversion is relative to the cumulative offset of the active
//! bone rather than re-derived from absolute bounds.

use crate::document::Bounds;

/// Convert bounds to a Spine-space offset relative to the cumulative
/// offset. Returns full-precision values; placement records are rounded
/// separately via [`round2`], bone offsets are not.
pub fn spine_offset(bounds: &Bounds, x_offset: f64, y_offset: f64) -> (f64, f64) {
    let x = bounds.left + bounds.width / 2.0 - x_offset;
    let y = -bounds.bottom() + bounds.height / 2.0 - y_offset;
    (x, y)
}

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derive the document origin from ruler guides.
///
/// Exactly one horizontal and one vertical guide define the origin
/// (`x = vertical guide`, `y = -horizontal guide + 1`); any other count
/// yields `None` and the caller falls back to (0, 0) with a warning.
pub fn origin_from_guides(horizontal: &[f64], vertical: &[f64]) -> Option<(f64, f64)> {
    if horizontal.len() == 1 && vertical.len() == 1 {
        Some((vertical[0], -horizontal[0] + 1.0))
    } else {
        None
    }
}
