//! TOML settings file support.
//!
//! Settings provide the file-level defaults that env vars may override; the
//! merged result is resolved into [`crate::config::BackendConfig`]. The file
//! lives at `<config dir>/linktolawyers/config.toml` unless `LTL_CONFIG`
//! points elsewhere. A missing file is not an error; all fields have
//! defaults suitable for local development against a hosted project.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL of the hosted project, e.g. `https://abc123.supabase.co`.
    pub url: Option<String>,
    /// Publishable (anon) API key. Row-level security does the real scoping.
    pub anon_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Where the signed-in session is cached between runs.
    /// Defaults to `<config dir>/linktolawyers/session.json`.
    pub cache_path: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the default location (or `LTL_CONFIG`).
    ///
    /// A missing file yields `Settings::default()`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = match std::env::var_os("LTL_CONFIG") {
            Some(p) => PathBuf::from(p),
            None => match default_settings_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        Self::load_from(&path)
    }

    /// Load settings from an explicit path; missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Settings {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
        };

        toml::from_str(&raw).map_err(|e| ConfigError::Settings {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// `<config dir>/linktolawyers/config.toml`, when a config dir exists.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("linktolawyers").join("config.toml"))
}

/// `<config dir>/linktolawyers/session.json`, when a config dir exists.
pub fn default_session_cache_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("linktolawyers").join("session.json"))
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_TIMEOUT_SECS, Settings};

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = Settings::load_from(&dir.path().join("nope.toml")).expect("load");
        assert_eq!(settings.backend.url, None);
        assert_eq!(settings.backend.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[backend]\nurl = \"https://proj.supabase.co\"\n",
        )
        .expect("write settings");

        let settings = Settings::load_from(&path).expect("load");
        assert_eq!(
            settings.backend.url.as_deref(),
            Some("https://proj.supabase.co")
        );
        assert_eq!(settings.backend.anon_key, None);
        assert_eq!(settings.backend.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend = 7").expect("write settings");
        assert!(Settings::load_from(&path).is_err());
    }
}
