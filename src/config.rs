//! Application configuration loading.
//!
//! Configuration comes from two places: required secrets from environment
//! variables (loaded via `.env` in `main`), and optional tunables from a
//! `tokenwatch.toml` settings file. A missing settings file falls back to
//! defaults; a malformed one is a startup error.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{path::Path, time::Duration};

/// Default path of the settings file, overridable via `TOKENWATCH_CONFIG`.
const DEFAULT_SETTINGS_PATH: &str = "tokenwatch.toml";

/// Tunables parsed from `tokenwatch.toml`. Every field is optional in the
/// file; absent fields take the defaults below.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Period of the auto-refresh task, in seconds.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Period of the keepalive self-ping, in seconds.
    #[serde(default = "default_keepalive_interval_secs")]
    pub keepalive_interval_secs: u64,
    /// Timeout applied to every outbound HTTP request, in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

const fn default_refresh_interval_secs() -> u64 {
    300
}

const fn default_keepalive_interval_secs() -> u64 {
    600
}

const fn default_http_timeout_secs() -> u64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            keepalive_interval_secs: default_keepalive_interval_secs(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// Immutable application configuration, shared via `Arc` after load.
///
/// The Discord bot token is deliberately not part of this struct; `main`
/// reads it from the environment directly before use.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API key for the Moralis Solana gateway.
    pub moralis_api_key: String,
    /// Optional URL to self-ping so the host does not idle the process out.
    pub keepalive_url: Option<String>,
    /// Tunables from the settings file.
    pub settings: Settings,
}

impl AppConfig {
    /// Auto-refresh period as a [`Duration`].
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.settings.refresh_interval_secs)
    }

    /// Keepalive self-ping period as a [`Duration`].
    #[must_use]
    pub const fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.settings.keepalive_interval_secs)
    }

    /// Outbound HTTP request timeout as a [`Duration`].
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.http_timeout_secs)
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load settings from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| {
        Error::Config(format!("Failed to read settings file {path_ref:?}: {e}"))
    })?;

    toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("Failed to parse settings file {path_ref:?}: {e}")))
}

/// Loads the full application configuration from the environment and the
/// optional settings file.
///
/// # Errors
/// Returns an error if `MORALIS_API_KEY` is missing or the settings file
/// exists but cannot be parsed.
pub fn load_app_configuration() -> Result<AppConfig> {
    let moralis_api_key = std::env::var("MORALIS_API_KEY")
        .map_err(|_| Error::Config("MORALIS_API_KEY not set in the environment".to_string()))?;

    let keepalive_url = std::env::var("KEEPALIVE_URL").ok().filter(|s| !s.is_empty());

    let settings_path = std::env::var("TOKENWATCH_CONFIG")
        .unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
    let settings = if Path::new(&settings_path).exists() {
        load_settings(&settings_path)?
    } else {
        tracing::info!(
            "No settings file at {}, using defaults.",
            settings_path
        );
        Settings::default()
    };

    Ok(AppConfig {
        moralis_api_key,
        keepalive_url,
        settings,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let toml_str = r#"
            refresh_interval_secs = 120
            keepalive_interval_secs = 300
            http_timeout_secs = 5
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.refresh_interval_secs, 120);
        assert_eq!(settings.keepalive_interval_secs, 300);
        assert_eq!(settings.http_timeout_secs, 5);
    }

    #[test]
    fn test_parse_partial_settings_uses_defaults() {
        let toml_str = "refresh_interval_secs = 60";

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.refresh_interval_secs, 60);
        assert_eq!(settings.keepalive_interval_secs, 600);
        assert_eq!(settings.http_timeout_secs, 10);
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.refresh_interval_secs, 300);
        assert_eq!(settings.keepalive_interval_secs, 600);
        assert_eq!(settings.http_timeout_secs, 10);
    }

    #[test]
    fn test_durations() {
        let config = AppConfig {
            moralis_api_key: "key".to_string(),
            keepalive_url: None,
            settings: Settings::default(),
        };
        assert_eq!(config.refresh_interval(), Duration::from_secs(300));
        assert_eq!(config.keepalive_interval(), Duration::from_secs(600));
        assert_eq!(config.http_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_settings_missing_file_errors() {
        let result = load_settings("definitely/not/a/real/path.toml");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
