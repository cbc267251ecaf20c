use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::endpoint::DEFAULT_ENDPOINT_URL;
use crate::error::{GastosError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
}

fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("gastos")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn log_path() -> PathBuf {
    config_dir().join("gastos.log")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Missing or unreadable files fall back to defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path(), settings)
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| GastosError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

/// Endpoint for this run: an explicit override wins over the settings file.
pub fn resolve_endpoint(override_url: Option<&str>) -> String {
    match override_url {
        Some(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => load_settings().endpoint_url,
    }
}

pub fn validate_endpoint_url(url: &str) -> Result<()> {
    let url = url.trim();
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(GastosError::Settings(format!(
            "Endpoint must be an http(s) URL, got '{url}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            endpoint_url: "https://example.test/exec".to_string(),
        };
        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("nope.json"));
        assert_eq!(s.endpoint_url, DEFAULT_ENDPOINT_URL);
    }

    #[test]
    fn test_load_returns_defaults_when_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_settings_from(&path), Settings::default());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let s: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(s.endpoint_url, DEFAULT_ENDPOINT_URL);
    }

    #[test]
    fn test_save_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("settings.json");
        save_settings_to(&path, &Settings::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_override_wins() {
        assert_eq!(resolve_endpoint(Some(" http://localhost:9/exec ")), "http://localhost:9/exec");
    }

    #[test]
    fn test_validate_endpoint_url() {
        assert!(validate_endpoint_url("https://script.google.com/x/exec").is_ok());
        assert!(validate_endpoint_url("ftp://nope").is_err());
        assert!(validate_endpoint_url("").is_err());
    }
}
