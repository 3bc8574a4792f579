//! Narrow read-only interface onto the host document model.
//!
//! The exporter never talks to an editor directly; it sees layer trees
//! through these traits. Production callers wrap their host's document
//! objects in an adapter, while [`MemoryDocument`] provides a synthetic
//! tree for tests and for the CLI's layer-manifest loader.

mod file;
mod memory;

use std::path::Path;

use crate::error::Result;

pub use file::{load_manifest, Guides, LayerEntry, LayerManifest};
pub use memory::{MemoryDocument, MemoryLayer};

/// Axis-aligned layer bounds in host pixel space (Y increases downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bottom edge (top + height).
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Class discriminator for layer nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A pixel-bearing layer.
    Paint,
    /// A group of child layers.
    Group,
    /// A selection mask; carries no exportable pixel content.
    SelectionMask,
}

/// One node in the layer tree.
pub trait LayerNode {
    fn name(&self) -> &str;

    fn kind(&self) -> NodeKind;

    fn visible(&self) -> bool;

    fn bounds(&self) -> Bounds;

    /// Direct children in the host's native (draw) order.
    fn children(&self) -> Vec<&dyn LayerNode>;

    /// Toggle pass-through compositing. Only meaningful for groups;
    /// implementations may treat this as a no-op for other kinds.
    fn set_pass_through(&self, enabled: bool);

    /// Render this node's pixels to a raster file at the given DPI.
    fn save_image(&self, path: &Path, dpi: (u32, u32)) -> Result<()>;
}

/// Document-level queries the exporter needs.
pub trait Document {
    fn root(&self) -> &dyn LayerNode;

    /// Horizontal ruler guide positions, in pixels from the top edge.
    fn horizontal_guides(&self) -> Vec<f64>;

    /// Vertical ruler guide positions, in pixels from the left edge.
    fn vertical_guides(&self) -> Vec<f64>;

    /// Toggle the host's batch mode (suppresses repaints and undo churn
    /// during bulk operations).
    fn set_batch_mode(&self, enabled: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_bottom() {
        let b = Bounds::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.bottom(), 60.0);
    }
}
