//! Export configurations: named sets of typed settings handed over by the editor.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};

/// Placeholder for the font file stem in file name templates.
pub const STEM_PLACEHOLDER: &str = "{stem}";

pub const AXIS_VALUES: &str = "Axis Values";
pub const MERGE_STAT: &str = "Merge STAT";
pub const UPGRADE_RANGES: &str = "Upgrade Ranges";
pub const NORMALIZE: &str = "Normalize";
pub const FVAR_AXES: &str = "fvar Axes";
pub const STYLE_NAME: &str = "Style Name";

/// The configuration file: every variable-font export of a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportsFile {
    pub exports: Vec<ExportConfiguration>,
}

impl ExportsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One named variable-font export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfiguration {
    pub name: String,
    /// File name template without suffix; `{stem}` is the source font's stem.
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Suffixes of the exported binaries to process.
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    #[serde(default)]
    pub settings: Vec<Setting>,
}

fn default_file_name() -> String {
    STEM_PLACEHOLDER.to_string()
}

fn default_formats() -> Vec<String> {
    vec!["ttf".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: SettingValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SettingValue {
    fn as_text(&self, key: &str) -> Result<&str> {
        match self {
            SettingValue::Text(text) => Ok(text),
            other => bail!("Setting '{key}' expects text, got {other:?}"),
        }
    }

    fn as_bool(&self, key: &str) -> Result<bool> {
        match self {
            SettingValue::Bool(flag) => Ok(*flag),
            SettingValue::Number(n) => Ok(*n != 0.0),
            other => bail!("Setting '{key}' expects a boolean, got {other:?}"),
        }
    }
}

/// The settings of one export, typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSettings {
    /// Raw axis value notation strings, in order.
    pub axis_values: Vec<String>,
    pub merge_stat: bool,
    pub upgrade_ranges: bool,
    pub normalize: bool,
    pub fvar_axes: Option<String>,
    pub style_name: Option<String>,
}

impl ExportSettings {
    pub fn from_settings(settings: &[Setting]) -> Result<Self> {
        let mut typed = Self::default();
        for Setting { key, value } in settings {
            match key.as_str() {
                AXIS_VALUES => typed.axis_values.push(value.as_text(key)?.to_string()),
                MERGE_STAT => typed.merge_stat = value.as_bool(key)?,
                UPGRADE_RANGES => typed.upgrade_ranges = value.as_bool(key)?,
                NORMALIZE => typed.normalize = value.as_bool(key)?,
                FVAR_AXES => typed.fvar_axes = Some(value.as_text(key)?.to_string()),
                STYLE_NAME => typed.style_name = Some(value.as_text(key)?.to_string()),
                _ => debug!("ignoring setting '{key}'"),
            }
        }
        Ok(typed)
    }
}

impl ExportConfiguration {
    pub fn settings(&self) -> Result<ExportSettings> {
        ExportSettings::from_settings(&self.settings)
            .with_context(|| format!("Export '{}'", self.name))
    }

    /// The exported binary for `font` in `format`: `dir/<template>.<format>`.
    pub fn candidate(&self, font: &Path, format: &str) -> PathBuf {
        let stem = font.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        let file_name = self.file_name.replace(STEM_PLACEHOLDER, &stem);
        let format = format.trim_start_matches('.');
        font.with_file_name(format!("{file_name}.{format}"))
    }
}
