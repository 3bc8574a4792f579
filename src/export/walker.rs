//! Depth-first layer-tree walk.
//!
//! Descends the document tree, registering bones for `(bone)` groups,
//! resolving slots, and exporting one raster image plus one skin
//! placement per leaf. All decisions are driven by name tags; see
//! [`crate::tags`].

use std::fs;
use std::path::Path;

use crate::document::{LayerNode, NodeKind};
use crate::error::{Result, SpinexError};
use crate::output::Printer;
use crate::skeleton::{Placement, SkeletonBuilder, DEFAULT_SKIN};
use crate::tags::{
    has_bone_tag, has_ignore_marker, has_merge_tag, has_slot_tag, skin_tag, strip_tags, TagKind,
};
use crate::transform::{round2, spine_offset};

use super::ExportContext;

/// Synthetic host layer used for rendering guides; never exported.
const DECORATION_LAYER: &str = "decorations-wrapper-layer";

/// Export DPI for leaf images.
const DPI: (u32, u32) = (96, 96);

pub struct Walker<'a> {
    builder: &'a mut SkeletonBuilder,
    out_dir: &'a Path,
    bone_length: f64,
    include_hidden: bool,
    printer: &'a Printer,
    exported: usize,
}

impl<'a> Walker<'a> {
    pub fn new(
        builder: &'a mut SkeletonBuilder,
        out_dir: &'a Path,
        bone_length: f64,
        include_hidden: bool,
        printer: &'a Printer,
    ) -> Self {
        Self {
            builder,
            out_dir,
            bone_length,
            include_hidden,
            printer,
            exported: 0,
        }
    }

    /// Number of leaf images exported so far.
    pub fn exported(&self) -> usize {
        self.exported
    }

    /// Walk the direct children of `node` in native draw order.
    pub fn walk(&mut self, node: &dyn LayerNode, ctx: &ExportContext) -> Result<()> {
        for child in node.children() {
            if child.kind() == NodeKind::SelectionMask {
                continue;
            }
            if !self.include_hidden && !child.visible() {
                continue;
            }
            let name = child.name();
            if has_ignore_marker(name) {
                continue;
            }
            if name == DECORATION_LAYER {
                continue;
            }

            // Pass-through groups report ill-defined bounds.
            if child.kind() == NodeKind::Group {
                child.set_pass_through(false);
            }

            if !child.children().is_empty() && !has_merge_tag(name) {
                self.walk_composite(child, ctx)?;
            } else {
                self.export_leaf(child, ctx)?;
            }
        }
        Ok(())
    }

    fn walk_composite(&mut self, child: &dyn LayerNode, ctx: &ExportContext) -> Result<()> {
        let name = child.name();
        let mut branch = ctx.clone();

        if has_bone_tag(name) {
            let bone_name = strip_tags(name, &[TagKind::Bone]);
            let (x, y) = spine_offset(&child.bounds(), ctx.x_offset, ctx.y_offset);
            self.builder
                .add_bone(&bone_name, &ctx.bone, self.bone_length, x, y)?;
            branch.bone = bone_name;
            // Offsets compose additively down the bone chain.
            branch.x_offset = ctx.x_offset + x;
            branch.y_offset = ctx.y_offset + y;
        }

        if has_slot_tag(name) {
            let slot_name = strip_tags(name, &[TagKind::Slot]);
            // The slot hangs off the bone we arrived with, not a bone the
            // same layer may have introduced.
            branch.slot = Some(self.builder.ensure_slot(&slot_name, &ctx.bone, None));
        }

        if let Some(skin) = skin_tag(name) {
            self.ensure_skin_dir(&skin)?;
            branch.skin = skin;
        }

        self.walk(child, &branch)
    }

    fn export_leaf(&mut self, child: &dyn LayerNode, ctx: &ExportContext) -> Result<()> {
        let mut skin = ctx.skin.clone();
        if let Some(own_skin) = skin_tag(child.name()) {
            self.ensure_skin_dir(&own_skin)?;
            skin = own_skin;
        }

        let clean = strip_tags(child.name(), &[TagKind::Merge, TagKind::Skin]);
        let file_name = if skin == DEFAULT_SKIN {
            clean.clone()
        } else {
            format!("{}/{}", skin, clean)
        };

        let out_path = if skin == DEFAULT_SKIN {
            self.out_dir.join(format!("{}.png", clean))
        } else {
            self.out_dir.join(&skin).join(format!("{}.png", clean))
        };
        child.save_image(&out_path, DPI)?;
        self.exported += 1;
        self.printer
            .status("Exporting", &format!("{} -> {}", clean, out_path.display()));

        let slot_idx = match ctx.slot {
            Some(idx) => {
                self.builder.set_attachment_if_unset(idx, &clean);
                idx
            }
            None => self
                .builder
                .ensure_slot(&clean, &ctx.bone, Some(clean.clone())),
        };
        let slot_name = self.builder.slot(slot_idx).name.clone();

        let bounds = child.bounds();
        let (x, y) = spine_offset(&bounds, ctx.x_offset, ctx.y_offset);
        let placement = Placement {
            x: round2(x),
            y: round2(y),
            width: bounds.width,
            height: bounds.height,
            name: (clean != file_name).then(|| file_name.clone()),
        };
        self.builder.add_placement(&skin, &slot_name, &clean, placement);
        Ok(())
    }

    fn ensure_skin_dir(&self, skin: &str) -> Result<()> {
        let dir = self.out_dir.join(skin);
        fs::create_dir_all(&dir).map_err(|e| SpinexError::Io {
            path: dir.clone(),
            message: format!("Failed to create skin directory: {}", e),
        })
    }
}
