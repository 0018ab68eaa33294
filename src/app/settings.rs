use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::infrastructure::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the rendering service
    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default = "default_preview_path")]
    pub preview_path: String,

    #[serde(default = "default_export_path")]
    pub export_path: String,

    /// Header carrying the anti-forgery token
    #[serde(default = "default_csrf_header")]
    pub csrf_header: String,

    /// Quiet period before a preview request is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Where exported PDFs are saved; the platform downloads dir when unset
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    #[serde(default)]
    pub open_after_export: bool,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_preview_path() -> String {
    "/preview/".to_string()
}

fn default_export_path() -> String {
    "/pdf/".to_string()
}

fn default_csrf_header() -> String {
    "X-CSRFToken".to_string()
}

fn default_debounce_ms() -> u64 {
    280
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            preview_path: default_preview_path(),
            export_path: default_export_path(),
            csrf_header: default_csrf_header(),
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            download_dir: None,
            open_after_export: false,
        }
    }
}

impl ClientSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn preview_url(&self) -> String {
        endpoint_url(&self.server_url, &self.preview_path)
    }

    pub fn export_url(&self) -> String {
        endpoint_url(&self.server_url, &self.export_path)
    }

    /// Directory exports are written to.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(config_path: &Path) -> Self {
        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Failed to parse settings: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist, use defaults
                let default = Self::default();
                // Try to save defaults for next time
                if let Err(e) = default.save_to(config_path) {
                    log::debug!("Could not write default settings: {}", e);
                }
                default
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), AppError> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(config_path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("markdown-styler");
        path.push("settings.json");
        path
    }
}

/// Join a server base URL and an endpoint path with exactly one slash.
pub fn endpoint_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
