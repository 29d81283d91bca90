//! Configuration management
//!
//! Settings live in `settings.json` inside the opptrack directory:
//! ```json
//! {
//!   "app": { "baseUrl": "http://localhost:8080", "timeoutSecs": 30 }
//! }
//! ```
//! Keys this client does not manage are kept when saving.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::result::Error;

/// Backend the client talks to when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Request timeout when nothing else is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the configured base URL
pub const BASE_URL_ENV: &str = "OPPTRACK_BASE_URL";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Opptrack configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend origin, without a trailing slash
    pub base_url: String,
    pub timeout_secs: u64,
    /// Whether `base_url` came from the environment rather than settings.json
    pub base_url_from_env: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url_from_env: false,
        }
    }
}

impl Config {
    /// Load config from the opptrack directory
    ///
    /// The base URL can be overridden with `OPPTRACK_BASE_URL`.
    pub fn load(opptrack_dir: &Path) -> Result<Self> {
        let env_url = std::env::var(BASE_URL_ENV).ok().filter(|v| !v.is_empty());
        Self::load_with_override(opptrack_dir, env_url.as_deref())
    }

    /// Load config, taking the base URL from `base_url_override` when given
    pub fn load_with_override(opptrack_dir: &Path, base_url_override: Option<&str>) -> Result<Self> {
        let raw = read_settings(opptrack_dir)?;

        let (base_url, base_url_from_env) = match base_url_override {
            Some(url) => (normalize_base_url(url)?, true),
            None => match raw.app.base_url.as_deref() {
                Some(url) => (normalize_base_url(url)?, false),
                None => (DEFAULT_BASE_URL.to_string(), false),
            },
        };

        Ok(Self {
            base_url,
            timeout_secs: raw.app.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            base_url_from_env,
        })
    }

    /// Save config to the opptrack directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, opptrack_dir: &Path) -> Result<()> {
        let mut settings = read_settings(opptrack_dir)?;

        // An environment override is not something to persist
        if !self.base_url_from_env {
            settings.app.base_url = Some(self.base_url.clone());
        }
        settings.app.timeout_secs = Some(self.timeout_secs);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(opptrack_dir.join("settings.json"), content)?;
        Ok(())
    }

    /// Point the client at a different backend
    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        self.base_url = normalize_base_url(url)?;
        self.base_url_from_env = false;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn read_settings(opptrack_dir: &Path) -> Result<SettingsFile> {
    let settings_path = opptrack_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

/// Check that `url` is an http(s) origin and drop any trailing slash
pub fn normalize_base_url(url: &str) -> std::result::Result<String, Error> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "Base URL must use http or https, got '{}'",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(Error::Config(format!("Base URL '{}' has no host", url)));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
