//! Synthetic in-memory document tree.
//!
//! Implements the [`Document`]/[`LayerNode`] traits without a host editor
//! behind them. Used by the test suite and by the CLI's layer-manifest
//! loader; leaves optionally carry decoded pixels that `save_image` writes
//! out as PNG.

use std::cell::Cell;
use std::path::Path;

use image::RgbaImage;

use crate::error::{Result, SpinexError};

use super::{Bounds, Document, LayerNode, NodeKind};

/// One layer in a [`MemoryDocument`].
#[derive(Debug, Clone)]
pub struct MemoryLayer {
    name: String,
    kind: NodeKind,
    visible: bool,
    bounds: Bounds,
    children: Vec<MemoryLayer>,
    pixels: Option<RgbaImage>,
    pass_through: Cell<bool>,
}

impl MemoryLayer {
    /// Create a paint layer with the given bounds and no pixel data.
    ///
    /// `save_image` on such a layer writes a transparent placeholder of the
    /// bounds' size, which keeps walker tests free of image fixtures.
    pub fn paint(name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Paint,
            visible: true,
            bounds,
            children: vec![],
            pixels: None,
            pass_through: Cell::new(false),
        }
    }

    /// Create a group layer from its children, with bounds covering them.
    pub fn group(name: impl Into<String>, children: Vec<MemoryLayer>) -> Self {
        let bounds = union_bounds(&children);
        Self {
            name: name.into(),
            kind: NodeKind::Group,
            visible: true,
            bounds,
            children,
            pixels: None,
            pass_through: Cell::new(true),
        }
    }

    /// Create a selection mask layer.
    pub fn selection_mask(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::SelectionMask,
            visible: true,
            bounds: Bounds::default(),
            children: vec![],
            pixels: None,
            pass_through: Cell::new(false),
        }
    }

    /// Attach decoded pixels; also sizes the bounds to the image.
    pub fn with_pixels(mut self, pixels: RgbaImage) -> Self {
        self.bounds.width = pixels.width() as f64;
        self.bounds.height = pixels.height() as f64;
        self.pixels = Some(pixels);
        self
    }

    /// Mark the layer invisible.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Override the group bounds computed from children.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Current pass-through compositing flag (groups only).
    pub fn pass_through(&self) -> bool {
        self.pass_through.get()
    }

    /// Direct children as concrete layers.
    pub fn child_layers(&self) -> &[MemoryLayer] {
        &self.children
    }

    fn shift(&mut self, dx: f64, dy: f64) {
        self.bounds.left += dx;
        self.bounds.top += dy;
        for child in &mut self.children {
            child.shift(dx, dy);
        }
    }
}

fn union_bounds(children: &[MemoryLayer]) -> Bounds {
    let mut iter = children.iter().map(|c| c.bounds);
    let Some(first) = iter.next() else {
        return Bounds::default();
    };
    let mut left = first.left;
    let mut top = first.top;
    let mut right = first.left + first.width;
    let mut bottom = first.bottom();
    for b in iter {
        left = left.min(b.left);
        top = top.min(b.top);
        right = right.max(b.left + b.width);
        bottom = bottom.max(b.bottom());
    }
    Bounds::new(left, top, right - left, bottom - top)
}

impl LayerNode for MemoryLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn children(&self) -> Vec<&dyn LayerNode> {
        self.children.iter().map(|c| c as &dyn LayerNode).collect()
    }

    fn set_pass_through(&self, enabled: bool) {
        if self.kind == NodeKind::Group {
            self.pass_through.set(enabled);
        }
    }

    fn save_image(&self, path: &Path, _dpi: (u32, u32)) -> Result<()> {
        let img = match &self.pixels {
            Some(pixels) => pixels.clone(),
            None => RgbaImage::new(
                (self.bounds.width.max(1.0)) as u32,
                (self.bounds.height.max(1.0)) as u32,
            ),
        };
        img.save(path).map_err(|e| SpinexError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write image: {}", e),
        })
    }
}

/// Synthetic document holding a [`MemoryLayer`] tree plus guides.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    root: MemoryLayer,
    horizontal_guides: Vec<f64>,
    vertical_guides: Vec<f64>,
    width: u32,
    height: u32,
    batch_mode: Cell<bool>,
}

impl MemoryDocument {
    /// Build a document from top-level layers.
    pub fn new(layers: Vec<MemoryLayer>) -> Self {
        let root = MemoryLayer::group("root", layers);
        let width = root.bounds.width.max(0.0) as u32;
        let height = root.bounds.height.max(0.0) as u32;
        Self {
            root,
            horizontal_guides: vec![],
            vertical_guides: vec![],
            width,
            height,
            batch_mode: Cell::new(false),
        }
    }

    /// Set the ruler guides.
    pub fn with_guides(mut self, horizontal: Vec<f64>, vertical: Vec<f64>) -> Self {
        self.horizontal_guides = horizontal;
        self.vertical_guides = vertical;
        self
    }

    /// Set the canvas extent explicitly.
    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether batch mode is currently enabled.
    pub fn batch_mode(&self) -> bool {
        self.batch_mode.get()
    }

    /// The synthetic root group as a concrete layer.
    pub fn root_layer(&self) -> &MemoryLayer {
        &self.root
    }

    /// Resize the canvas, shifting all layer content by the given offset.
    ///
    /// This is the canvas-size adjustment applied before export: a plain
    /// value copy of the requested extent plus a translation of every
    /// layer's bounds.
    pub fn resize_canvas(&mut self, x_offset: f64, y_offset: f64, width: u32, height: u32) {
        self.root.shift(x_offset, y_offset);
        for guide in &mut self.horizontal_guides {
            *guide += y_offset;
        }
        for guide in &mut self.vertical_guides {
            *guide += x_offset;
        }
        self.width = width;
        self.height = height;
    }
}

impl Document for MemoryDocument {
    fn root(&self) -> &dyn LayerNode {
        &self.root
    }

    fn horizontal_guides(&self) -> Vec<f64> {
        self.horizontal_guides.clone()
    }

    fn vertical_guides(&self) -> Vec<f64> {
        self.vertical_guides.clone()
    }

    fn set_batch_mode(&self, enabled: bool) {
        self.batch_mode.set(enabled);
    }
}
