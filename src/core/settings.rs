use crate::shared::paths::{get_default_sdcard_dir, get_settings_path};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Directory standing in for the removable storage root.
    #[serde(default)]
    pub storage_root: Option<PathBuf>,
    /// Raw four-byte-per-pixel frame file to capture from.
    #[serde(default)]
    pub frame_dump: Option<PathBuf>,
    #[serde(default = "default_hotkey")]
    pub hotkey: String,
}

fn default_hotkey() -> String {
    "F9".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            storage_root: None,
            frame_dump: None,
            hotkey: default_hotkey(),
        }
    }
}

impl AppSettings {
    pub fn storage_root(&self) -> PathBuf {
        self.storage_root
            .clone()
            .unwrap_or_else(get_default_sdcard_dir)
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Failed to parse hotkey: {0}")]
    HotkeyParseError(String),
}

pub fn load_settings() -> AppSettings {
    let path = get_settings_path();

    if !path.exists() {
        return AppSettings::default();
    }

    match load_settings_from_file(&path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(target: "system", "Ignoring {:?}: {}", path, e);
            AppSettings::default()
        }
    }
}

pub fn load_settings_from_file(path: &Path) -> Result<AppSettings, SettingsError> {
    let contents = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&contents)?;
    Ok(settings)
}

pub fn save_settings_to_file(settings: &AppSettings, path: &Path) -> Result<(), SettingsError> {
    let contents = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(all(feature = "desktop", target_os = "linux"))]
pub fn parse_hotkey(hotkey_str: &str) -> Result<global_hotkey::hotkey::HotKey, SettingsError> {
    hotkey_str
        .parse()
        .map_err(|e: global_hotkey::hotkey::HotKeyParseError| {
            SettingsError::HotkeyParseError(e.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "frameDump": "/tmp/frame.raw" }"#).unwrap();

        let settings = load_settings_from_file(&path).unwrap();

        assert_eq!(settings.frame_dump, Some(PathBuf::from("/tmp/frame.raw")));
        assert_eq!(settings.storage_root, None);
        assert_eq!(settings.hotkey, "F9");
    }

    #[test]
    fn test_settings_survive_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let settings = AppSettings {
            storage_root: Some(dir.path().join("sd")),
            frame_dump: None,
            hotkey: "Ctrl+Shift+S".to_string(),
        };

        save_settings_to_file(&settings, &path).unwrap();

        assert_eq!(load_settings_from_file(&path).unwrap(), settings);
    }

    #[test]
    fn test_malformed_settings_are_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_settings_from_file(&path).unwrap_err();
        assert!(matches!(err, SettingsError::ParseError(_)));
    }

    #[test]
    fn test_default_storage_root() {
        assert!(AppSettings::default().storage_root().ends_with("sdcard"));
    }
}
