//! User settings stored as settings.json in the app data directory

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const AUTH_URL_ENV: &str = "SAFEDOCS_AUTH_URL";
const FILES_URL_ENV: &str = "SAFEDOCS_FILES_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Services
    pub auth_url: String,
    pub files_url: String,

    // Paths
    pub download_dir: Option<String>,

    // Folder uploads skip paths matching these globs
    pub exclude_patterns: Vec<String>,

    // Theme
    pub accent_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auth_url: "http://localhost:8000".to_string(),
            files_url: "http://localhost:8001".to_string(),
            download_dir: None,
            exclude_patterns: vec![
                "node_modules/**".to_string(),
                "**/.DS_Store".to_string(),
                "**/.env*".to_string(),
            ],
            accent_color: "#A159E1".to_string(),
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        let settings = match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        };
        settings.with_env_overrides()
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(AUTH_URL_ENV) {
            debug!(url = %url, "Auth URL overridden from environment");
            self.auth_url = url;
        }
        if let Ok(url) = std::env::var(FILES_URL_ENV) {
            debug!(url = %url, "Files URL overridden from environment");
            self.files_url = url;
        }
        self
    }

    pub fn upload_endpoint(&self) -> String {
        format!("{}/api/v1/files/upload", self.files_url.trim_end_matches('/'))
    }

    pub fn download_dir_or_default(&self) -> PathBuf {
        self.download_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")))
    }
}

pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("SafeDocs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.exclude_patterns, Settings::default().exclude_patterns);
        assert_eq!(settings.accent_color, "#A159E1");
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.download_dir, None);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            download_dir: Some("/tmp/docs".to_string()),
            exclude_patterns: vec!["*.log".to_string()],
            ..Settings::default()
        };
        settings.save(dir.path());

        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.download_dir.as_deref(), Some("/tmp/docs"));
        assert_eq!(loaded.exclude_patterns, vec!["*.log".to_string()]);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), r##"{"accent_color":"#00FF00"}"##)
            .unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.accent_color, "#00FF00");
        assert_eq!(settings.exclude_patterns, Settings::default().exclude_patterns);
    }

    #[test]
    fn upload_endpoint_trims_trailing_slash() {
        let settings = Settings {
            files_url: "http://files.local:8001/".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            settings.upload_endpoint(),
            "http://files.local:8001/api/v1/files/upload"
        );
    }
}
