//! Per-branch export state.

use crate::skeleton::{DEFAULT_SKIN, ROOT_BONE};

/// Context threaded through the recursive walk.
///
/// Each recursive call receives its own clone with any tag-driven
/// overrides applied locally, so sibling branches never observe each
/// other's bone, slot or skin changes. `slot` is an index into the
/// builder's slot vector.
#[derive(Debug, Clone)]
pub struct ExportContext {
    pub bone: String,
    pub slot: Option<usize>,
    pub skin: String,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl ExportContext {
    /// Context for the root walk call, seeded with the document origin.
    pub fn root(x_origin: f64, y_origin: f64) -> Self {
        Self {
            bone: ROOT_BONE.to_string(),
            slot: None,
            skin: DEFAULT_SKIN.to_string(),
            x_offset: x_origin,
            y_offset: y_origin,
        }
    }
}
