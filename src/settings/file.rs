//! JSON settings file handling
//!
//! The file is a JSON object; only its `"lookaway"` member is read. Keys missing
//! from that member keep the value from the base settings (usually the CLI flags).

use std::path::Path;
use anyhow::Context;
use serde_json::Value;

use super::{Settings, SETTINGS_GROUP};

/// Overlay the settings group of `document` onto `base`
pub fn merge_settings_document(document: &str, base: &Settings) -> anyhow::Result<Settings> {
    let document: Value = serde_json::from_str(document)
        .context("settings file is not valid JSON")?;

    let mut merged = serde_json::to_value(base)?;
    if let Some(group) = document.get(SETTINGS_GROUP) {
        let group = group
            .as_object()
            .with_context(|| format!("\"{}\" must be a JSON object", SETTINGS_GROUP))?;

        if let Some(fields) = merged.as_object_mut() {
            for (key, value) in group {
                fields.insert(key.clone(), value.clone());
            }
        }
    }

    serde_json::from_value(merged)
        .with_context(|| format!("invalid value in \"{}\" settings", SETTINGS_GROUP))
}

/// Read the settings file at `path` and overlay it onto `base`
pub async fn read_settings_file(path: &Path, base: &Settings) -> anyhow::Result<Settings> {
    let document = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read settings file {}", path.display()))?;

    merge_settings_document(&document, base)
        .with_context(|| format!("failed to parse settings file {}", path.display()))
}
