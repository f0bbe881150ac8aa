//! Configuration management for bizchat
//!
//! Stores settings in ~/.config/bizchat/config.json

use crate::chat::SendPolicy;
use crate::upload::{default_extensions, UploadRules};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SERVER_URL_ENV: &str = "BIZCHAT_SERVER_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the assistant backend
    pub server_url: String,
    /// Timeout for chat and panel requests
    pub request_timeout_secs: u64,
    /// Timeout for document uploads (the server processes them synchronously)
    pub upload_timeout_secs: u64,
    pub send_policy: SendPolicy,
    /// Post a confirmation message in the chat after a successful upload
    pub announce_uploads: bool,
    /// Advisory upload size limit
    pub max_upload_bytes: u64,
    pub accepted_extensions: Vec<String>,
    /// Log file; defaults to the platform data dir
    pub log_file: Option<PathBuf>,
    /// Keep the server session between runs so one-shot commands see the
    /// business a previous upload registered
    pub remember_session: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 60,
            upload_timeout_secs: 300,
            send_policy: SendPolicy::default(),
            announce_uploads: true,
            max_upload_bytes: 16 * 1024 * 1024,
            accepted_extensions: default_extensions(),
            log_file: None,
            remember_session: true,
        }
    }
}

impl Config {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("bizchat"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Where the server session cookie is kept between runs
    pub fn session_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("session.json"))
    }

    /// Load config from disk, or return default
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match serde_json::from_str(&content) {
                Ok(config) => return config,
                Err(err) => {
                    preserve_corrupt_config(path, &content);
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "config file was corrupted; a backup was saved and defaults were loaded"
                    );
                    eprintln!(
                        "  Warning: Config file was corrupted ({}). A backup was saved and defaults were loaded.",
                        err
                    );
                }
            }
        }
        Self::default()
    }

    /// Save config to disk
    pub fn save(&self) -> Result<(), String> {
        let path =
            Self::config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        write_private_file(path, &content).map_err(|e| format!("Failed to write config: {}", e))
    }

    /// Environment overrides (applied after the file, before CLI flags)
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                self.server_url = url.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let url = url::Url::parse(&self.server_url)
            .map_err(|e| format!("Invalid server URL '{}': {}", self.server_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "Server URL must use http or https, got '{}'",
                url.scheme()
            ));
        }
        if self.request_timeout_secs == 0 || self.upload_timeout_secs == 0 {
            return Err("Timeouts must be at least one second".to_string());
        }
        if self.accepted_extensions.is_empty() {
            return Err("At least one accepted file extension is required".to_string());
        }
        Ok(())
    }

    pub fn upload_rules(&self) -> UploadRules {
        UploadRules {
            accepted_extensions: self
                .accepted_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            max_bytes: self.max_upload_bytes,
        }
    }

    /// Where logs go when no path is configured
    pub fn default_log_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("bizchat").join("bizchat.log"))
    }

    /// Get the config file location for display
    pub fn config_location() -> String {
        Self::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.config/bizchat/config.json".to_string())
    }
}

fn preserve_corrupt_config(path: &Path, content: &str) {
    let corrupt_path = path.with_extension("json.corrupt");
    if fs::rename(path, &corrupt_path).is_err() {
        let _ = fs::write(&corrupt_path, content);
    }
}

/// Write a file only the current user can read, creating its directory.
pub(crate) fn write_private_file(path: &Path, content: &str) -> Result<(), String> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| format!("cannot create {}: {}", dir.display(), e))?;
    }

    #[cfg(unix)]
    {
        write_atomic_private(path, content)
    }

    #[cfg(not(unix))]
    {
        fs::write(path, content).map_err(|e| e.to_string())
    }
}

#[cfg(unix)]
fn write_atomic_private(path: &Path, content: &str) -> Result<(), String> {
    use std::fs::OpenOptions;
    use std::os::unix::fs::PermissionsExt;

    let tmp_path = path.with_extension("tmp");
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(|e| e.to_string())?;

    if let Err(e) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
        tracing::warn!(error = %e, path = %tmp_path.display(), "failed to restrict temp file permissions");
    }

    file.write_all(content.as_bytes())
        .map_err(|e| e.to_string())?;

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_url, "http://127.0.0.1:5000");
        assert_eq!(config.send_policy, SendPolicy::RequireBusiness);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json"));
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"server_url": "https://help.example.com", "send_policy": "allow_without_business"}"#,
        )
        .unwrap();
        let config = Config::load_from(&path);
        assert_eq!(config.server_url, "https://help.example.com");
        assert_eq!(config.send_policy, SendPolicy::AllowWithoutBusiness);
        assert_eq!(config.upload_timeout_secs, 300);
    }

    #[test]
    fn test_corrupt_file_is_preserved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let config = Config::load_from(&path);
        assert_eq!(config.server_url, Config::default().server_url);
        assert!(dir.path().join("config.json.corrupt").exists());
        assert!(!path.exists());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            request_timeout_secs: 15,
            announce_uploads: false,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path);
        assert_eq!(loaded.request_timeout_secs, 15);
        assert!(!loaded.announce_uploads);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            server_url: "ftp://example.com".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_upload_rules_normalize_extensions() {
        let config = Config {
            accepted_extensions: vec![".PDF".into(), "txt".into()],
            ..Config::default()
        };
        assert_eq!(config.upload_rules().accepted_extensions, vec!["pdf", "txt"]);
    }
}
