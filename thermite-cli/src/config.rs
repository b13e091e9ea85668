//! Table preset loading (presets.toml)
//!
//! A preset names a signal set plus the two table toggles, so recurring
//! analyses do not need the full flag spelling every time.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thermite_decoder::TableOptions;

/// Preset file contents: a list of named table requests
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PresetFile {
    #[serde(default)]
    pub preset: Vec<TablePreset>,
}

/// One named signal set plus table options
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TablePreset {
    pub name: String,
    pub signals: Vec<String>,
    #[serde(flatten)]
    pub options: TableOptions,
}

impl PresetFile {
    /// Look up a preset by name
    pub fn find(&self, name: &str) -> Option<&TablePreset> {
        self.preset.iter().find(|p| p.name == name)
    }
}

/// Load presets from a TOML file
pub fn load_presets(path: &Path) -> Result<PresetFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read preset file: {:?}", path))?;

    let presets: PresetFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse preset file: {:?}", path))?;

    Ok(presets)
}
