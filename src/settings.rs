//! Per-document export settings sidecar.
//!
//! Settings live next to the source document at
//! `<documentFileName>.spinesettings.json` and carry the last-used output
//! directory, the include-hidden flag and the optional canvas-size
//! adjustment. Field names are wire-compatible with older exporters, hence
//! the mixed naming convention.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpinexError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(rename = "outDir")]
    pub out_dir: PathBuf,

    #[serde(rename = "includeHidden")]
    pub include_hidden: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_height: Option<u32>,
}

/// Sidecar path for a source document: the document file name with
/// `.spinesettings.json` appended.
pub fn settings_path(document: &Path) -> PathBuf {
    let mut name = document.as_os_str().to_os_string();
    name.push(".spinesettings.json");
    PathBuf::from(name)
}

impl ExportSettings {
    /// Load settings from a sidecar file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SpinexError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read settings: {}", e),
        })?;
        serde_json::from_str(&content).map_err(|e| SpinexError::Settings {
            message: format!("Invalid settings file {}: {}", path.display(), e),
            help: Some("Delete the sidecar to start from defaults".to_string()),
        })
    }

    /// Write settings to a sidecar file, pretty-printed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| SpinexError::Settings {
            message: format!("Failed to serialize settings: {}", e),
            help: None,
        })?;
        std::fs::write(path, json).map_err(|e| SpinexError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write settings: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_settings_path_appends_suffix() {
        let path = settings_path(Path::new("/work/hero.doc.json"));
        assert_eq!(
            path,
            PathBuf::from("/work/hero.doc.json.spinesettings.json")
        );
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.spinesettings.json");
        let settings = ExportSettings {
            out_dir: PathBuf::from("/work/out"),
            include_hidden: true,
            canvas_width: Some(128),
            canvas_height: None,
        };

        settings.save(&path).unwrap();
        let loaded = ExportSettings::load(&path).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_wire_field_names() {
        let settings = ExportSettings {
            out_dir: PathBuf::from("out"),
            include_hidden: false,
            canvas_width: None,
            canvas_height: None,
        };
        let json = serde_json::to_value(&settings).unwrap();

        assert_eq!(json["outDir"], "out");
        assert_eq!(json["includeHidden"], false);
        assert!(json.get("canvas_width").is_none());
    }

    #[test]
    fn test_load_legacy_without_canvas_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.spinesettings.json");
        std::fs::write(&path, r#"{"outDir": "out", "includeHidden": true}"#).unwrap();

        let loaded = ExportSettings::load(&path).unwrap();
        assert_eq!(loaded.out_dir, PathBuf::from("out"));
        assert!(loaded.include_hidden);
        assert_eq!(loaded.canvas_width, None);
    }

    #[test]
    fn test_load_invalid_json_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.spinesettings.json");
        std::fs::write(&path, "{bad").unwrap();

        let err = ExportSettings::load(&path).unwrap_err();
        assert!(matches!(err, SpinexError::Settings { .. }));
    }
}
