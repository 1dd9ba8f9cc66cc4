//! Runtime configuration
//!
//! Loaded once at startup from the process environment (plus an optional
//! `.env` file). A missing API base URL is a fatal startup error.

use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const API_BASE_URL_KEY: &str = "API_BASE_URL";
pub const API_TIMEOUT_KEY: &str = "API_TIMEOUT_SECS";
pub const APP_ENV_KEY: &str = "APP_ENV";
pub const VALIDATION_MODE_KEY: &str = "VALIDATION_MODE";

/// Fixed upper bound for a single API call unless overridden.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// What to do when a response does not match the API contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Raise the validation error to the caller (development, tests).
    Strict,
    /// Log and substitute the fallback value (production).
    #[default]
    Lenient,
}

impl ValidationMode {
    /// Mode implied by an `APP_ENV` value.
    pub fn for_app_env(app_env: Option<&str>) -> Self {
        match app_env.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("development") | Some("dev") | Some("test") => Self::Strict,
            _ => Self::Lenient,
        }
    }
}

impl std::str::FromStr for ValidationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(ConfigError::Invalid {
                key: VALIDATION_MODE_KEY,
                reason: format!("expected 'strict' or 'lenient', got '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub request_timeout: Duration,
    pub validation_mode: ValidationMode,
}

impl AppConfig {
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            validation_mode: ValidationMode::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup(API_BASE_URL_KEY)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing {
                key: API_BASE_URL_KEY,
            })?;
        let api_base_url = parse_base_url(raw_url.trim())?;

        let request_timeout = match lookup(API_TIMEOUT_KEY) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let validation_mode = match lookup(VALIDATION_MODE_KEY) {
            Some(raw) => raw.parse()?,
            None => ValidationMode::for_app_env(lookup(APP_ENV_KEY).as_deref()),
        };

        Ok(Self {
            api_base_url,
            request_timeout,
            validation_mode,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        key: API_BASE_URL_KEY,
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::Invalid {
            key: API_BASE_URL_KEY,
            reason: format!("expected an http(s) base URL, got '{}'", raw),
        });
    }

    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            key: API_TIMEOUT_KEY,
            reason: format!("expected a positive number of seconds, got '{}'", raw),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_base_url_fails_fast() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing {
                key: API_BASE_URL_KEY
            }
        );

        let err = AppConfig::from_lookup(lookup_from(&[(API_BASE_URL_KEY, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }

    #[test]
    fn defaults_apply() {
        let config =
            AppConfig::from_lookup(lookup_from(&[(API_BASE_URL_KEY, "https://food.example/api")]))
                .unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://food.example/api");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.validation_mode, ValidationMode::Lenient);
    }

    #[test]
    fn development_env_is_strict() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (API_BASE_URL_KEY, "http://localhost:3000"),
            (APP_ENV_KEY, "Development"),
        ]))
        .unwrap();
        assert_eq!(config.validation_mode, ValidationMode::Strict);
    }

    #[test]
    fn explicit_mode_overrides_app_env() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (API_BASE_URL_KEY, "http://localhost:3000"),
            (APP_ENV_KEY, "development"),
            (VALIDATION_MODE_KEY, "lenient"),
        ]))
        .unwrap();
        assert_eq!(config.validation_mode, ValidationMode::Lenient);
    }

    #[test]
    fn rejects_bad_values() {
        let err = AppConfig::from_lookup(lookup_from(&[(API_BASE_URL_KEY, "ftp://x")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == API_BASE_URL_KEY));

        let err = AppConfig::from_lookup(lookup_from(&[
            (API_BASE_URL_KEY, "http://localhost"),
            (API_TIMEOUT_KEY, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == API_TIMEOUT_KEY));

        let err = AppConfig::from_lookup(lookup_from(&[
            (API_BASE_URL_KEY, "http://localhost"),
            (VALIDATION_MODE_KEY, "loud"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == VALIDATION_MODE_KEY));
    }
}
