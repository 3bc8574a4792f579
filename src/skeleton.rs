//! Spine skeleton model and JSON serialization.
//!
//! Accumulates bones, slots and skins during the export walk and writes
//! the final `spine.json`. Slot order is draw order and must match
//! first-creation order, so slots live in a vector with a name index on
//! the side; skin maps preserve insertion order the same way.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpinexError};

/// The base skin name.
pub const DEFAULT_SKIN: &str = "default";

/// The implicit root bone name.
pub const ROOT_BONE: &str = "root";

/// A named transform node in the skeleton.
///
/// The root bone carries only its name; every other bone has a parent,
/// a length and an offset relative to the parent's origin. Bone offsets
/// keep full precision (only placements are rounded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// A named attachment point bound to one bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub bone: String,
    pub attachment: Option<String>,
}

/// An image placement shown in a slot under a given skin.
///
/// `name` is set only when the on-disk file name differs from the logical
/// attachment name (i.e. the image lives in a skin subfolder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// skin name -> slot name -> attachment name -> placement.
pub type SkinMap = IndexMap<String, IndexMap<String, IndexMap<String, Placement>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonMeta {
    pub images: String,
}

/// The complete serialized document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub skeleton: SkeletonMeta,
    pub bones: Vec<Bone>,
    pub slots: Vec<Slot>,
    pub skins: SkinMap,
    pub animations: serde_json::Map<String, serde_json::Value>,
}

impl Skeleton {
    /// Write `spine.json` into the output directory, pretty-printed with
    /// 2-space indentation. Overwrites any existing file.
    pub fn write(&self, directory: &Path) -> Result<PathBuf> {
        let path = directory.join("spine.json");
        let json = serde_json::to_string_pretty(self).map_err(|e| SpinexError::Export {
            message: format!("Failed to serialize skeleton: {}", e),
            help: None,
        })?;
        fs::write(&path, json).map_err(|e| SpinexError::Io {
            path: path.clone(),
            message: format!("Failed to write spine.json: {}", e),
        })?;
        Ok(path)
    }
}

/// Mutable accumulator threaded through the export walk.
#[derive(Debug)]
pub struct SkeletonBuilder {
    bones: Vec<Bone>,
    bone_names: HashSet<String>,
    slots: Vec<Slot>,
    slot_index: HashMap<String, usize>,
    skins: SkinMap,
}

impl SkeletonBuilder {
    /// Create a builder seeded with the root bone and the default skin.
    pub fn new() -> Self {
        let root = Bone {
            name: ROOT_BONE.to_string(),
            parent: None,
            length: None,
            x: None,
            y: None,
        };
        let mut skins = SkinMap::new();
        skins.insert(DEFAULT_SKIN.to_string(), IndexMap::new());
        Self {
            bones: vec![root],
            bone_names: HashSet::from([ROOT_BONE.to_string()]),
            slots: vec![],
            slot_index: HashMap::new(),
            skins,
        }
    }

    /// Register a bone. The parent must already exist (the tree is built
    /// top-down) and names must be unique across the whole document.
    pub fn add_bone(&mut self, name: &str, parent: &str, length: f64, x: f64, y: f64) -> Result<()> {
        if !self.bone_names.contains(parent) {
            return Err(SpinexError::Export {
                message: format!("Bone '{}' references unknown parent '{}'", name, parent),
                help: None,
            });
        }
        if !self.bone_names.insert(name.to_string()) {
            return Err(SpinexError::Export {
                message: format!("Duplicate bone name '{}'", name),
                help: Some(
                    "Bone names come from (bone)-tagged layers and must be unique".to_string(),
                ),
            });
        }
        self.bones.push(Bone {
            name: name.to_string(),
            parent: Some(parent.to_string()),
            length: Some(length),
            x: Some(x),
            y: Some(y),
        });
        Ok(())
    }

    /// Find an existing slot by name.
    pub fn find_slot(&self, name: &str) -> Option<usize> {
        self.slot_index.get(name).copied()
    }

    /// Look up a slot by name, creating it at the end of the draw order if
    /// it does not exist yet. The first creation fixes the owning bone and
    /// initial attachment; later calls reuse the slot untouched.
    pub fn ensure_slot(&mut self, name: &str, bone: &str, attachment: Option<String>) -> usize {
        if let Some(idx) = self.find_slot(name) {
            return idx;
        }
        let idx = self.slots.len();
        self.slots.push(Slot {
            name: name.to_string(),
            bone: bone.to_string(),
            attachment,
        });
        self.slot_index.insert(name.to_string(), idx);
        idx
    }

    pub fn slot(&self, idx: usize) -> &Slot {
        &self.slots[idx]
    }

    /// Set the slot's default attachment if it has none yet (first leaf
    /// under an explicit slot tag wins).
    pub fn set_attachment_if_unset(&mut self, idx: usize, attachment: &str) {
        let slot = &mut self.slots[idx];
        if slot.attachment.is_none() {
            slot.attachment = Some(attachment.to_string());
        }
    }

    /// Record an attachment placement under a skin and slot.
    pub fn add_placement(
        &mut self,
        skin: &str,
        slot_name: &str,
        attachment: &str,
        placement: Placement,
    ) {
        self.skins
            .entry(skin.to_string())
            .or_default()
            .entry(slot_name.to_string())
            .or_default()
            .insert(attachment.to_string(), placement);
    }

    /// Assemble the final skeleton. `images` is the output directory
    /// recorded in the skeleton header.
    pub fn finish(self, images: &str) -> Skeleton {
        Skeleton {
            skeleton: SkeletonMeta {
                images: images.to_string(),
            },
            bones: self.bones,
            slots: self.slots,
            skins: self.skins,
            animations: serde_json::Map::new(),
        }
    }
}

impl Default for SkeletonBuilder {
    fn default() -> Self {
        Self::new()
    }
}
