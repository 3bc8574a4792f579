//! spinex - Layered document to Spine 2D exporter
//!
//! A library for walking a layered image-editor document tree and
//! exporting it as a Spine skeletal-animation JSON file plus per-slot
//! image assets. Bones, slots and skins are driven by naming-convention
//! tags embedded in layer names.

pub mod cli;
pub mod document;
pub mod error;
pub mod export;
pub mod output;
pub mod settings;
pub mod skeleton;
pub mod tags;
pub mod transform;

pub use document::{load_manifest, Bounds, Document, LayerNode, MemoryDocument, MemoryLayer, NodeKind};
pub use error::{Result, SpinexError};
pub use export::{export_document, ExportContext};
pub use settings::{settings_path, ExportSettings};
pub use skeleton::{Bone, Placement, Skeleton, SkeletonBuilder, SkinMap, Slot};
pub use tags::{
    has_bone_tag, has_ignore_marker, has_merge_tag, has_slot_tag, skin_tag, strip_tags, TagKind,
};
