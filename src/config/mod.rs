//! Resolved runtime configuration.
//!
//! Follows the settings-then-env precedence used across the crate: the TOML
//! settings file provides defaults, env vars override. The anon key is held
//! behind [`SecretString`] so it never lands in debug output or logs.

pub mod helpers;

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::config::helpers::{optional_env, parse_u64_env};
use crate::error::ConfigError;
use crate::settings::{self, Settings};

/// Connection parameters for the hosted backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: Url,
    pub anon_key: SecretString,
    pub timeout: Duration,
}

/// Where the signed-in session is cached between runs.
#[derive(Debug, Clone)]
pub struct SessionCacheConfig {
    pub path: PathBuf,
}

impl BackendConfig {
    pub fn resolve(settings: &Settings) -> Result<Self, ConfigError> {
        let raw_url = optional_env("LTL_BACKEND_URL")?
            .or_else(|| settings.backend.url.clone())
            .ok_or_else(|| ConfigError::MissingValue {
                key: "LTL_BACKEND_URL".to_string(),
            })?;

        let url = Url::parse(&raw_url).map_err(|e| ConfigError::InvalidValue {
            key: "LTL_BACKEND_URL".to_string(),
            message: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                key: "LTL_BACKEND_URL".to_string(),
                message: "URL must be an absolute http(s) base".to_string(),
            });
        }

        let anon_key = optional_env("LTL_ANON_KEY")?
            .or_else(|| settings.backend.anon_key.clone())
            .ok_or_else(|| ConfigError::MissingValue {
                key: "LTL_ANON_KEY".to_string(),
            })?;

        let timeout_secs = parse_u64_env("LTL_TIMEOUT_SECS", settings.backend.timeout_secs)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "LTL_TIMEOUT_SECS".to_string(),
                message: "timeout must be at least 1 second".to_string(),
            });
        }

        Ok(Self {
            url,
            anon_key: SecretString::from(anon_key),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl SessionCacheConfig {
    pub fn resolve(settings: &Settings) -> Result<Self, ConfigError> {
        let path = match optional_env("LTL_SESSION_CACHE")? {
            Some(raw) => PathBuf::from(raw),
            None => match settings.session.cache_path.clone() {
                Some(p) => p,
                None => settings::default_session_cache_path().ok_or_else(|| {
                    ConfigError::MissingValue {
                        key: "LTL_SESSION_CACHE".to_string(),
                    }
                })?,
            },
        };
        Ok(Self { path })
    }
}

#[cfg(test)]
mod tests {
    use super::BackendConfig;
    use crate::error::ConfigError;
    use crate::settings::Settings;

    fn settings_with_backend(url: &str, key: &str) -> Settings {
        let mut settings = Settings::default();
        settings.backend.url = Some(url.to_string());
        settings.backend.anon_key = Some(key.to_string());
        settings
    }

    #[test]
    fn resolve_requires_a_url() {
        let err = BackendConfig::resolve(&Settings::default()).expect_err("must fail");
        let ConfigError::MissingValue { key } = err else {
            panic!("expected MissingValue");
        };
        assert_eq!(key, "LTL_BACKEND_URL");
    }

    #[test]
    fn resolve_accepts_settings_values() {
        let settings = settings_with_backend("https://proj.supabase.co", "anon-key");
        let config = BackendConfig::resolve(&settings).expect("resolve");
        assert_eq!(config.url.as_str(), "https://proj.supabase.co/");
        assert_eq!(config.timeout.as_secs(), 30);
    }

    #[test]
    fn resolve_rejects_non_base_urls() {
        let settings = settings_with_backend("mailto:ops@example.com", "anon-key");
        let err = BackendConfig::resolve(&settings).expect_err("must fail");
        let ConfigError::InvalidValue { key, .. } = err else {
            panic!("expected InvalidValue");
        };
        assert_eq!(key, "LTL_BACKEND_URL");
    }
}
