//! Layer manifest loading.
//!
//! The CLI consumes documents described by a small JSON manifest: ruler
//! guides plus a nested layer list where leaves reference PNG files on
//! disk. The manifest is decoded into a [`MemoryDocument`], so the
//! exporter sees it through the same traits as any host adapter.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SpinexError};

use super::{Bounds, MemoryDocument, MemoryLayer};

/// Top-level manifest structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LayerManifest {
    pub guides: Guides,
    pub layers: Vec<LayerEntry>,
}

/// Ruler guide positions.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Guides {
    pub horizontal: Vec<f64>,
    pub vertical: Vec<f64>,
}

/// One layer in the manifest: a group (has `children`) or a leaf (has
/// `image`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayerEntry {
    pub name: String,
    pub visible: bool,
    pub image: Option<PathBuf>,
    pub x: f64,
    pub y: f64,
    pub children: Vec<LayerEntry>,
}

impl Default for LayerEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            visible: true,
            image: None,
            x: 0.0,
            y: 0.0,
            children: vec![],
        }
    }
}

/// Load a layer manifest and build the in-memory document it describes.
///
/// Relative image paths are resolved against the manifest's directory.
pub fn load_manifest(path: &Path) -> Result<MemoryDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| SpinexError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read document manifest: {}", e),
    })?;

    let manifest: LayerManifest = serde_json::from_str(&content).map_err(|e| SpinexError::Parse {
        message: format!("Invalid document manifest: {}", e),
        help: Some("Expected JSON with `guides` and `layers` keys".to_string()),
    })?;

    let base = path.parent().unwrap_or(Path::new("."));
    let layers = manifest
        .layers
        .iter()
        .map(|entry| build_layer(entry, base))
        .collect::<Result<Vec<_>>>()?;

    Ok(MemoryDocument::new(layers)
        .with_guides(manifest.guides.horizontal, manifest.guides.vertical))
}

fn build_layer(entry: &LayerEntry, base: &Path) -> Result<MemoryLayer> {
    if entry.name.is_empty() {
        return Err(SpinexError::Parse {
            message: "Layer entry is missing a name".to_string(),
            help: None,
        });
    }

    if !entry.children.is_empty() {
        if entry.image.is_some() {
            return Err(SpinexError::Parse {
                message: format!("Layer '{}' has both children and an image", entry.name),
                help: Some("Groups composite their children; remove the image".to_string()),
            });
        }
        let children = entry
            .children
            .iter()
            .map(|c| build_layer(c, base))
            .collect::<Result<Vec<_>>>()?;
        let mut layer = MemoryLayer::group(&entry.name, children);
        if !entry.visible {
            layer = layer.hidden();
        }
        return Ok(layer);
    }

    let Some(image_path) = &entry.image else {
        return Err(SpinexError::Parse {
            message: format!("Layer '{}' has neither children nor an image", entry.name),
            help: Some("Leaf layers must reference a PNG via `image`".to_string()),
        });
    };

    let resolved = if image_path.is_absolute() {
        image_path.clone()
    } else {
        base.join(image_path)
    };
    let pixels = image::open(&resolved)
        .map_err(|e| SpinexError::Io {
            path: resolved.clone(),
            message: format!("Failed to read layer image: {}", e),
        })?
        .to_rgba8();

    let mut layer = MemoryLayer::paint(&entry.name, Bounds::new(entry.x, entry.y, 0.0, 0.0))
        .with_pixels(pixels);
    if !entry.visible {
        layer = layer.hidden();
    }
    Ok(layer)
}
