//! Document export.
//!
//! [`export_document`] is the single operation the core exposes: walk a
//! layer tree depth-first, write one raster image per exported leaf, and
//! serialize the accumulated skeleton to `spine.json` in the output
//! directory. Single-threaded and synchronous; filesystem failures
//! propagate and already-written artifacts are left in place.

mod context;
mod walker;

use std::fs;
use std::path::Path;

pub use context::ExportContext;

use crate::document::Document;
use crate::error::{Result, SpinexError};
use crate::output::Printer;
use crate::skeleton::{Skeleton, SkeletonBuilder};
use crate::transform::origin_from_guides;
use walker::Walker;

/// Brackets the walk in the host's batch mode, restoring it even when
/// the walk errors partway.
struct BatchGuard<'a> {
    document: &'a dyn Document,
}

impl<'a> BatchGuard<'a> {
    fn new(document: &'a dyn Document) -> Self {
        document.set_batch_mode(true);
        Self { document }
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.document.set_batch_mode(false);
    }
}

/// Export a document to Spine JSON plus per-slot images.
///
/// `bone_length` is the length recorded on every registered bone
/// (0..=100); `include_hidden` also exports invisible layers. Returns the
/// assembled skeleton after writing `<output_directory>/spine.json`.
pub fn export_document(
    document: &dyn Document,
    output_directory: &Path,
    bone_length: u8,
    include_hidden: bool,
) -> Result<Skeleton> {
    let printer = Printer::new();

    if !output_directory.exists() {
        fs::create_dir_all(output_directory).map_err(|e| SpinexError::Io {
            path: output_directory.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let horizontal = document.horizontal_guides();
    let vertical = document.vertical_guides();
    let (x_origin, y_origin) = match origin_from_guides(&horizontal, &vertical) {
        Some(origin) => origin,
        None => {
            printer.warning(
                "Guides",
                &format!(
                    "expected exactly 1 horizontal and 1 vertical guide, found {} and {}; \
                     not using an origin",
                    horizontal.len(),
                    vertical.len()
                ),
            );
            (0.0, 0.0)
        }
    };

    let mut builder = SkeletonBuilder::new();
    let exported = {
        let _batch = BatchGuard::new(document);
        let mut walker = Walker::new(
            &mut builder,
            output_directory,
            f64::from(bone_length),
            include_hidden,
            &printer,
        );
        walker.walk(document.root(), &ExportContext::root(x_origin, y_origin))?;
        walker.exported()
    };

    let skeleton = builder.finish(&output_directory.to_string_lossy());
    let json_path = skeleton.write(output_directory)?;
    printer.success(
        "Finished",
        &format!("{} attachment(s), {}", exported, json_path.display()),
    );
    Ok(skeleton)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Bounds, MemoryDocument, MemoryLayer};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn leaf(name: &str, left: f64, top: f64, w: f64, h: f64) -> MemoryLayer {
        MemoryLayer::paint(name, Bounds::new(left, top, w, h))
    }

    #[test]
    fn test_bone_offsets_compose_down_the_chain() {
        // Origin (10, 10) from guides: x = vertical, y = -horizontal + 1.
        // Group bounds have Spine-space center (100, 50).
        let doc = MemoryDocument::new(vec![MemoryLayer::group(
            "Torso (bone)",
            vec![leaf("Body", 80.0, -60.0, 40.0, 20.0)],
        )])
        .with_guides(vec![-9.0], vec![10.0]);
        let dir = tempdir().unwrap();

        let skeleton = export_document(&doc, dir.path(), 20, false).unwrap();

        assert_eq!(skeleton.bones.len(), 2);
        let torso = &skeleton.bones[1];
        assert_eq!(torso.name, "Torso");
        assert_eq!(torso.parent.as_deref(), Some("root"));
        assert_eq!(torso.length, Some(20.0));
        assert_eq!(torso.x, Some(90.0));
        assert_eq!(torso.y, Some(40.0));

        // The leaf is centered on the bone, so its placement is (0, 0)
        // against the cumulative offset (100, 50).
        let placement = &skeleton.skins["default"]["Body"]["Body"];
        assert_eq!(placement.x, 0.0);
        assert_eq!(placement.y, 0.0);
        assert_eq!(placement.width, 40.0);
        assert_eq!(placement.height, 20.0);
    }

    #[test]
    fn test_sibling_skins_share_one_slot() {
        let doc = MemoryDocument::new(vec![
            leaf("Eyes [skin:A]", 0.0, 0.0, 4.0, 4.0),
            leaf("Eyes [skin:B]", 0.0, 0.0, 4.0, 4.0),
        ]);
        let dir = tempdir().unwrap();

        let skeleton = export_document(&doc, dir.path(), 0, false).unwrap();

        assert_eq!(skeleton.slots.len(), 1);
        assert_eq!(skeleton.slots[0].name, "Eyes");
        assert_eq!(skeleton.slots[0].bone, "root");
        assert!(skeleton.skins["A"]["Eyes"].contains_key("Eyes"));
        assert!(skeleton.skins["B"]["Eyes"].contains_key("Eyes"));
        assert!(dir.path().join("A/Eyes.png").exists());
        assert!(dir.path().join("B/Eyes.png").exists());
    }

    #[test]
    fn test_skin_leaf_exports_into_subfolder() {
        let doc = MemoryDocument::new(vec![leaf("Body [skin:Alt] (merge)", 0.0, 0.0, 8.0, 8.0)]);
        let dir = tempdir().unwrap();

        let skeleton = export_document(&doc, dir.path(), 0, false).unwrap();

        assert!(dir.path().join("Alt/Body.png").exists());
        let placement = &skeleton.skins["Alt"]["Body"]["Body"];
        assert_eq!(placement.name.as_deref(), Some("Alt/Body"));
        // Default-skin attachments never carry a name override.
        let doc2 = MemoryDocument::new(vec![leaf("Body", 0.0, 0.0, 8.0, 8.0)]);
        let dir2 = tempdir().unwrap();
        let skeleton2 = export_document(&doc2, dir2.path(), 0, false).unwrap();
        assert_eq!(skeleton2.skins["default"]["Body"]["Body"].name, None);
    }

    #[test]
    fn test_merge_group_becomes_single_leaf() {
        let doc = MemoryDocument::new(vec![MemoryLayer::group(
            "Face (merge)",
            vec![
                leaf("Mouth", 0.0, 0.0, 4.0, 4.0),
                leaf("Nose", 4.0, 0.0, 4.0, 4.0),
            ],
        )]);
        let dir = tempdir().unwrap();

        let skeleton = export_document(&doc, dir.path(), 0, false).unwrap();

        assert!(dir.path().join("Face.png").exists());
        assert!(!dir.path().join("Mouth.png").exists());
        assert_eq!(skeleton.slots.len(), 1);
        assert_eq!(skeleton.slots[0].name, "Face");
        assert_eq!(skeleton.skins["default"]["Face"]["Face"].width, 8.0);
    }

    #[test]
    fn test_slot_tag_owns_descendant_leaves() {
        let doc = MemoryDocument::new(vec![MemoryLayer::group(
            "Mouth (slot)",
            vec![
                leaf("Open", 0.0, 0.0, 4.0, 4.0),
                leaf("Closed", 0.0, 0.0, 4.0, 4.0),
            ],
        )]);
        let dir = tempdir().unwrap();

        let skeleton = export_document(&doc, dir.path(), 0, false).unwrap();

        assert_eq!(skeleton.slots.len(), 1);
        let slot = &skeleton.slots[0];
        assert_eq!(slot.name, "Mouth");
        assert_eq!(slot.bone, "root");
        // First leaf wins the default attachment.
        assert_eq!(slot.attachment.as_deref(), Some("Open"));
        assert!(skeleton.skins["default"]["Mouth"].contains_key("Open"));
        assert!(skeleton.skins["default"]["Mouth"].contains_key("Closed"));
    }

    #[test]
    fn test_slot_tag_binds_to_current_bone_not_new_bone() {
        let doc = MemoryDocument::new(vec![MemoryLayer::group(
            "Arm (bone)(slot)",
            vec![leaf("Hand", 0.0, 0.0, 4.0, 4.0)],
        )]);
        let dir = tempdir().unwrap();

        let skeleton = export_document(&doc, dir.path(), 0, false).unwrap();

        // Each tag strips only itself, so the other tag stays in the name.
        assert_eq!(skeleton.bones[1].name, "Arm (slot)");
        assert_eq!(skeleton.slots[0].name, "Arm (bone)");
        // The slot keeps the bone that was current when the layer was
        // reached, not the bone the same layer introduced.
        assert_eq!(skeleton.slots[0].bone, "root");
    }

    #[test]
    fn test_hidden_layers_skipped_unless_included() {
        let layers = vec![
            leaf("Visible", 0.0, 0.0, 2.0, 2.0),
            leaf("Hidden", 0.0, 0.0, 2.0, 2.0).hidden(),
        ];
        let dir = tempdir().unwrap();
        let skeleton =
            export_document(&MemoryDocument::new(layers.clone()), dir.path(), 0, false).unwrap();
        assert_eq!(skeleton.slots.len(), 1);

        let dir2 = tempdir().unwrap();
        let skeleton =
            export_document(&MemoryDocument::new(layers), dir2.path(), 0, true).unwrap();
        assert_eq!(skeleton.slots.len(), 2);
    }

    #[test]
    fn test_skip_rules() {
        let doc = MemoryDocument::new(vec![
            MemoryLayer::selection_mask("mask"),
            leaf("scratch [ignore]", 0.0, 0.0, 2.0, 2.0),
            leaf("decorations-wrapper-layer", 0.0, 0.0, 2.0, 2.0),
            leaf("Kept", 0.0, 0.0, 2.0, 2.0),
        ]);
        let dir = tempdir().unwrap();

        let skeleton = export_document(&doc, dir.path(), 0, false).unwrap();

        assert_eq!(skeleton.slots.len(), 1);
        assert_eq!(skeleton.slots[0].name, "Kept");
    }

    #[test]
    fn test_group_pass_through_forced_off() {
        let doc = MemoryDocument::new(vec![MemoryLayer::group(
            "G",
            vec![leaf("Body", 0.0, 0.0, 2.0, 2.0)],
        )]);
        let dir = tempdir().unwrap();

        assert!(doc.root_layer().child_layers()[0].pass_through());

        export_document(&doc, dir.path(), 0, false).unwrap();

        assert!(!doc.root_layer().child_layers()[0].pass_through());
    }

    #[test]
    fn test_zero_or_many_guides_disable_origin() {
        for guides in [
            (vec![], vec![]),
            (vec![1.0, 2.0], vec![3.0]),
            (vec![1.0], vec![3.0, 4.0]),
        ] {
            let doc = MemoryDocument::new(vec![leaf("Body", 10.0, 10.0, 4.0, 4.0)])
                .with_guides(guides.0, guides.1);
            let dir = tempdir().unwrap();

            let skeleton = export_document(&doc, dir.path(), 0, false).unwrap();

            let placement = &skeleton.skins["default"]["Body"]["Body"];
            assert_eq!(placement.x, 12.0);
            assert_eq!(placement.y, -12.0);
        }
    }

    #[test]
    fn test_duplicate_bone_name_is_rejected() {
        let doc = MemoryDocument::new(vec![
            MemoryLayer::group("Arm (bone)", vec![leaf("L", 0.0, 0.0, 2.0, 2.0)]),
            MemoryLayer::group("Arm [bone]", vec![leaf("R", 4.0, 0.0, 2.0, 2.0)]),
        ]);
        let dir = tempdir().unwrap();

        let err = export_document(&doc, dir.path(), 0, false).unwrap_err();
        assert!(err.to_string().contains("Duplicate bone name"));
    }

    #[test]
    fn test_batch_mode_restored_after_error() {
        let doc = MemoryDocument::new(vec![
            MemoryLayer::group("Arm (bone)", vec![leaf("L", 0.0, 0.0, 2.0, 2.0)]),
            MemoryLayer::group("Arm (bone)", vec![leaf("R", 4.0, 0.0, 2.0, 2.0)]),
        ]);
        let dir = tempdir().unwrap();

        assert!(export_document(&doc, dir.path(), 0, false).is_err());
        assert!(!doc.batch_mode());
    }

    #[test]
    fn test_export_is_byte_stable() {
        let build = || {
            MemoryDocument::new(vec![MemoryLayer::group(
                "Torso (bone)",
                vec![
                    leaf("Body", 10.0, 10.0, 8.0, 8.0),
                    leaf("Head [skin:Alt]", 10.0, 2.0, 8.0, 8.0),
                ],
            )])
            .with_guides(vec![5.0], vec![5.0])
        };
        let dir_a = tempdir().unwrap();
        let dir_b = tempdir().unwrap();

        export_document(&build(), dir_a.path(), 10, false).unwrap();
        export_document(&build(), dir_b.path(), 10, false).unwrap();

        let json_a = std::fs::read_to_string(dir_a.path().join("spine.json")).unwrap();
        let json_b = std::fs::read_to_string(dir_b.path().join("spine.json")).unwrap();
        // The images directory differs per tempdir; mask it out.
        let strip = |s: &str| {
            s.lines()
                .filter(|l| !l.contains("\"images\""))
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert_eq!(strip(&json_a), strip(&json_b));
    }

    #[test]
    fn test_empty_skin_name_is_distinct_from_default() {
        let doc = MemoryDocument::new(vec![leaf("Body [skin]", 0.0, 0.0, 4.0, 4.0)]);
        let dir = tempdir().unwrap();

        let skeleton = export_document(&doc, dir.path(), 0, false).unwrap();

        assert!(skeleton.skins.contains_key(""));
        let placement = &skeleton.skins[""]["Body"]["Body"];
        assert_eq!(placement.name.as_deref(), Some("/Body"));
        assert!(dir.path().join("Body.png").exists());
    }

    #[test]
    fn test_nested_bones_round_placements_only() {
        let doc = MemoryDocument::new(vec![MemoryLayer::group(
            "Torso (bone)",
            vec![leaf("Body", 0.0, 0.0, 3.0, 3.0)],
        )]);
        let dir = tempdir().unwrap();

        let skeleton = export_document(&doc, dir.path(), 0, false).unwrap();

        // Bone keeps full precision (center of a 3x3 at the origin).
        assert_eq!(skeleton.bones[1].x, Some(1.5));
        assert_eq!(skeleton.bones[1].y, Some(-1.5));
        let placement = &skeleton.skins["default"]["Body"]["Body"];
        assert_eq!(placement.x, 0.0);
        assert_eq!(placement.y, 0.0);
    }
}
