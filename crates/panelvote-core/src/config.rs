//! Client configuration (stored in ~/.config/panelvote/config.toml)
//!
//! Resolution order, lowest to highest precedence: built-in defaults, the
//! config file, environment variables, explicit CLI flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};

const CONFIG_DIR: &str = "panelvote";
const CONFIG_FILE: &str = "config.toml";
pub const CONFIG_DIR_ENV_VAR: &str = "PANELVOTE_CONFIG_DIR";
pub const ENDPOINT_ENV_VAR: &str = "PANELVOTE_ENDPOINT";
pub const POLL_INTERVAL_ENV_VAR: &str = "PANELVOTE_POLL_INTERVAL_MS";
pub const TIMEOUT_ENV_VAR: &str = "PANELVOTE_TIMEOUT";

/// Default poll interval for the game-state sync loop
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;

/// Default timeout for backend requests
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Marker left in deployment templates in place of the real endpoint URL
const PLACEHOLDER_MARKER: &str = "BURAYA";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend endpoint URL (empty means not configured)
    pub endpoint: String,
    pub poll_interval_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ClientConfig {
    /// Directory holding the config file and the session cache
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            return Ok(PathBuf::from(env_dir));
        }
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR))
            .ok_or_else(|| PanelError::Other("unable to determine config directory".to_string()))
    }

    /// Load file config (if any) and apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_dir()?.join(CONFIG_FILE);
        let mut config = Self::load_from(&path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| PanelError::io_operation("read config", path, e))?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config.clamped())
    }

    /// Apply `PANELVOTE_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENDPOINT_ENV_VAR) {
            if !url.is_empty() {
                self.endpoint = url;
            }
        }
        if let Ok(interval) = std::env::var(POLL_INTERVAL_ENV_VAR) {
            if let Ok(ms) = interval.parse::<u64>() {
                self.poll_interval_ms = ms;
            }
        }
        if let Ok(timeout) = std::env::var(TIMEOUT_ENV_VAR) {
            if let Ok(seconds) = timeout.parse::<u64>() {
                self.timeout_seconds = seconds;
            }
        }
        *self = self.clone().clamped();
    }

    /// Override the endpoint from an explicit flag
    pub fn with_endpoint(mut self, endpoint: Option<&str>) -> Self {
        if let Some(url) = endpoint.filter(|u| !u.is_empty()) {
            self.endpoint = url.to_string();
        }
        self
    }

    fn clamped(mut self) -> Self {
        self.poll_interval_ms = self.poll_interval_ms.clamp(250, 60_000);
        self.timeout_seconds = self.timeout_seconds.clamp(1, 120);
        self
    }

    /// True when an endpoint is set and is not a template placeholder
    pub fn is_configured(&self) -> bool {
        let url = self.endpoint.trim();
        !url.is_empty() && !url.contains(PLACEHOLDER_MARKER)
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_unconfigured() {
        let config = ClientConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.poll_interval_ms, 3_000);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_placeholder_endpoint_is_unconfigured() {
        let config = ClientConfig::default()
            .with_endpoint(Some("https://script.example.com/BURAYA_URL/exec"));
        assert!(!config.is_configured());

        let config = ClientConfig::default().with_endpoint(Some("https://example.com/exec"));
        assert!(config.is_configured());
    }

    #[test]
    fn test_flag_override_ignores_empty() {
        let config = ClientConfig {
            endpoint: "https://a.example/exec".into(),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.clone().with_endpoint(Some("")).endpoint,
            "https://a.example/exec"
        );
        assert_eq!(
            config.with_endpoint(Some("https://b.example/exec")).endpoint,
            "https://b.example/exec"
        );
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = ClientConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_with_clamping() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(
            &path,
            "endpoint = \"https://example.com/exec\"\npoll_interval_ms = 1000\ntimeout_seconds = 30\n",
        )
        .unwrap();
        let config = ClientConfig {
            endpoint: "https://example.com/exec".into(),
            poll_interval_ms: 1_000,
            timeout_seconds: 30,
        };
        assert_eq!(ClientConfig::load_from(&path).unwrap(), config);

        fs::write(&path, "poll_interval_ms = 5\ntimeout_seconds = 9999\n").unwrap();
        let loaded = ClientConfig::load_from(&path).unwrap();
        assert_eq!(loaded.poll_interval_ms, 250);
        assert_eq!(loaded.timeout_seconds, 120);
        assert!(loaded.endpoint.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "endpoint = [").unwrap();
        assert!(matches!(
            ClientConfig::load_from(&path),
            Err(PanelError::Toml(_))
        ));
    }
}
