//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use portfolio_core::ranking::DEFAULT_DRAG_ACTIVATION_DISTANCE;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub chat_base_url: String,
    pub log_level: Level,
    pub chat_poll_interval: Duration,
    pub drag_activation_distance: f64,
    pub thread_store_path: PathBuf,
    pub request_timeout: Duration,
    pub mock_fallback: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Backend endpoints ---
        let api_base_url = lookup("BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar("BASE_URL".to_string()))?;
        let api_base_url = normalize_base_url("BASE_URL", &api_base_url)?;

        let chat_base_url = match lookup("CHAT_BASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => normalize_base_url("CHAT_BASE_URL", &url)?,
            None => api_base_url.clone(),
        };

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Behaviour tuning ---
        let poll_ms = parse_or("CHAT_POLL_INTERVAL_MS", lookup("CHAT_POLL_INTERVAL_MS"), 1000_u64)?;
        if poll_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "CHAT_POLL_INTERVAL_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let drag_activation_distance = parse_or(
            "DRAG_ACTIVATION_DISTANCE",
            lookup("DRAG_ACTIVATION_DISTANCE"),
            DEFAULT_DRAG_ACTIVATION_DISTANCE,
        )?;
        if !drag_activation_distance.is_finite() || drag_activation_distance < 0.0 {
            return Err(ConfigError::InvalidValue(
                "DRAG_ACTIVATION_DISTANCE".to_string(),
                format!("'{}' must be a non-negative number", drag_activation_distance),
            ));
        }

        let thread_store_path = lookup("THREAD_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./.portfolio/local_storage.json"));

        let timeout_secs = parse_or("REQUEST_TIMEOUT_SECS", lookup("REQUEST_TIMEOUT_SECS"), 10_u64)?;
        let mock_fallback = parse_or("MOCK_FALLBACK", lookup("MOCK_FALLBACK"), true)?;

        Ok(Self {
            api_base_url,
            chat_base_url,
            log_level,
            chat_poll_interval: Duration::from_millis(poll_ms),
            drag_activation_distance,
            thread_store_path,
            request_timeout: Duration::from_secs(timeout_secs),
            mock_fallback,
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
    }
}

fn normalize_base_url(key: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("'{}' is not an http(s) URL", raw),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_base_url_is_set() {
        let config = Config::from_lookup(lookup(&[("BASE_URL", "http://localhost:5000/")])).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.chat_base_url, "http://localhost:5000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.chat_poll_interval, Duration::from_millis(1000));
        assert_eq!(config.drag_activation_distance, 5.0);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.mock_fallback);
    }

    #[test]
    fn base_url_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref key) if key == "BASE_URL"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("BASE_URL", "https://api.example.com"),
            ("CHAT_BASE_URL", "https://chat.example.com/"),
            ("RUST_LOG", "debug"),
            ("CHAT_POLL_INTERVAL_MS", "250"),
            ("DRAG_ACTIVATION_DISTANCE", "8.5"),
            ("MOCK_FALLBACK", "false"),
        ]))
        .unwrap();
        assert_eq!(config.chat_base_url, "https://chat.example.com");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.chat_poll_interval, Duration::from_millis(250));
        assert_eq!(config.drag_activation_distance, 8.5);
        assert!(!config.mock_fallback);
    }

    #[test]
    fn invalid_values_are_reported_with_their_key() {
        for (key, value) in [
            ("CHAT_POLL_INTERVAL_MS", "0"),
            ("CHAT_POLL_INTERVAL_MS", "soon"),
            ("DRAG_ACTIVATION_DISTANCE", "-1"),
            ("RUST_LOG", "chatty"),
        ] {
            let err = Config::from_lookup(lookup(&[("BASE_URL", "http://x"), (key, value)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref k, _) if k == key), "{key}={value}");
        }
        let err = Config::from_lookup(lookup(&[("BASE_URL", "localhost:5000")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k, _) if k == "BASE_URL"));
    }
}
