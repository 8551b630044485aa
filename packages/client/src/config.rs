//! Client configuration loaded from the environment or a TOML file.
//!
//! Environment variables:
//!
//! - `UIDAI_API_BASE_URL`: backend origin, default `http://localhost:5000`
//! - `UIDAI_API_TIMEOUT_SECS`: per-request timeout, default 30
//! - `UIDAI_API_PREFIX`: path the endpoints live under, default `/api`;
//!   `/` for a backend serving them at the origin root
//!
//! A TOML file may set the same keys (`base_url`, `timeout_secs`,
//! `api_prefix`); missing keys take their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default backend origin.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default path prefix of the endpoints.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Errors loading a [`ClientConfig`] from a file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        /// The path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for a [`ClientConfig`].
    #[error("Invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Connection settings for [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin; the prefixed endpoint paths are appended to it.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Path the endpoints live under (`/api` behind the frontend proxy,
    /// `/` when talking to the backend process directly).
    pub api_prefix: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads the configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset. An unparseable timeout is logged
    /// and replaced by the default.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(base_url) = get("UIDAI_API_BASE_URL") {
            config.base_url = base_url.trim().to_string();
        }

        if let Some(prefix) = get("UIDAI_API_PREFIX") {
            config.api_prefix = prefix.trim().to_string();
        }

        if let Some(raw) = get("UIDAI_API_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout_secs = secs,
                _ => log::warn!(
                    "Ignoring UIDAI_API_TIMEOUT_SECS={raw:?}; using {DEFAULT_TIMEOUT_SECS}s"
                ),
            }
        }

        config
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is not valid TOML or has
    /// fields of the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded client config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// The per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The endpoint prefix with one leading slash and no trailing slash;
    /// empty for the origin root.
    #[must_use]
    pub fn api_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.api_prefix(), "/api");
    }

    #[test]
    fn prefix_is_normalised() {
        for (raw, expected) in [("/", ""), ("", ""), ("api", "/api"), ("/v1/api/", "/v1/api")] {
            let config = ClientConfig {
                api_prefix: raw.to_string(),
                ..ClientConfig::default()
            };
            assert_eq!(config.api_prefix(), expected, "{raw}");
        }

        let config = ClientConfig::from_lookup(lookup(&[("UIDAI_API_PREFIX", "/")]));
        assert_eq!(config.api_prefix(), "");
        let config = ClientConfig::from_toml_str("api_prefix = \"/\"").unwrap();
        assert_eq!(config.api_prefix(), "");
    }

    #[test]
    fn reads_env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("UIDAI_API_BASE_URL", "https://portal.example.in"),
            ("UIDAI_API_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.base_url, "https://portal.example.in");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn bad_timeout_falls_back() {
        for raw in ["soon", "0", "-3"] {
            let config = ClientConfig::from_lookup(lookup(&[("UIDAI_API_TIMEOUT_SECS", raw)]));
            assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS, "{raw}");
        }
    }

    #[test]
    fn parses_partial_toml() {
        let config = ClientConfig::from_toml_str("timeout_secs = 10\n").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 10);

        let config =
            ClientConfig::from_toml_str("base_url = \"http://10.0.0.2:5000\"\ntimeout_secs = 12")
                .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:5000");
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(matches!(
            ClientConfig::from_toml_str("timeout_secs = \"ten\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ClientConfig::load(Path::new("/nonexistent/uidai-portal.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
