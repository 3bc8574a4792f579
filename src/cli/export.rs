//! Export command implementation.
//!
//! Loads the layer manifest, applies sidecar defaults and the canvas-size
//! adjustment, runs the export, and rewrites the sidecar on success.

use std::path::PathBuf;

use clap::Args;

use crate::document::load_manifest;
use crate::error::Result;
use crate::export::export_document;
use crate::output::{plural, Printer};
use crate::settings::{settings_path, ExportSettings};

/// Export a layer manifest to spine.json plus image assets
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Layer manifest describing the document to export
    pub document: PathBuf,

    /// Output directory (defaults to the sidecar's last value, then the
    /// document's directory)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Length recorded on every registered bone
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub bone_length: u8,

    /// Also export hidden layers
    #[arg(long)]
    pub include_hidden: bool,

    /// Skip reading and writing the settings sidecar
    #[arg(long)]
    pub no_settings: bool,
}

pub fn run(args: ExportArgs) -> Result<()> {
    let printer = Printer::new();

    let sidecar = settings_path(&args.document);
    let settings = if !args.no_settings && sidecar.exists() {
        Some(ExportSettings::load(&sidecar)?)
    } else {
        None
    };

    let mut document = load_manifest(&args.document)?;

    // Canvas-size adjustment: a plain value copy of the stored extent.
    if let Some(settings) = &settings {
        if let (Some(width), Some(height)) = (settings.canvas_width, settings.canvas_height) {
            document.resize_canvas(0.0, 0.0, width, height);
        }
    }

    let output = args
        .output
        .clone()
        .or_else(|| settings.as_ref().map(|s| s.out_dir.clone()))
        .unwrap_or_else(|| {
            args.document
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
        });
    let include_hidden =
        args.include_hidden || settings.as_ref().is_some_and(|s| s.include_hidden);

    let skeleton = export_document(&document, &output, args.bone_length, include_hidden)?;

    printer.success(
        "Exported",
        &format!(
            "{}, {}, {}",
            plural(skeleton.bones.len() - 1, "bone", "bones"),
            plural(skeleton.slots.len(), "slot", "slots"),
            plural(skeleton.skins.len(), "skin", "skins"),
        ),
    );

    if !args.no_settings {
        let updated = ExportSettings {
            out_dir: output,
            include_hidden,
            canvas_width: settings.as_ref().and_then(|s| s.canvas_width),
            canvas_height: settings.as_ref().and_then(|s| s.canvas_height),
        };
        updated.save(&sidecar)?;
    }

    Ok(())
}
