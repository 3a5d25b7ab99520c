//! Small env-var parsing helpers shared by the config resolvers.

use crate::error::ConfigError;

/// Read an env var, treating empty/whitespace values as unset.
pub fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "value is not valid UTF-8".to_string(),
        }),
    }
}

/// Read a u64 env var, falling back to the settings-file value.
pub fn parse_u64_env(key: &str, fallback: u64) -> Result<u64, ConfigError> {
    match optional_env(key)? {
        Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected an integer, got '{raw}'"),
        }),
        None => Ok(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::{optional_env, parse_u64_env};

    // Env-var tests mutate process state; each test uses its own key.

    #[test]
    fn optional_env_treats_blank_as_unset() {
        std::env::set_var("LTL_TEST_BLANK", "   ");
        assert_eq!(optional_env("LTL_TEST_BLANK").expect("read env"), None);
        std::env::remove_var("LTL_TEST_BLANK");
    }

    #[test]
    fn parse_u64_env_rejects_garbage() {
        std::env::set_var("LTL_TEST_U64", "not-a-number");
        assert!(parse_u64_env("LTL_TEST_U64", 5).is_err());
        std::env::remove_var("LTL_TEST_U64");
    }

    #[test]
    fn parse_u64_env_uses_fallback_when_unset() {
        assert_eq!(parse_u64_env("LTL_TEST_U64_UNSET", 30).expect("parse"), 30);
    }
}
