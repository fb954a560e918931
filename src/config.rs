use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_SESSION_FILE: &str = ".rental-hub/session.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAYMENT_DELAY_MS: u64 = 2500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

/// Runtime settings for the client and the CLI.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub session_file: PathBuf,
    pub timeout: Duration,
    /// Delay of the simulated payment processor
    pub payment_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            payment_delay: Duration::from_millis(DEFAULT_PAYMENT_DELAY_MS),
        }
    }
}

impl ClientConfig {
    /// Reads `.env` (if any) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = match lookup("RENTAL_API_BASE_URL") {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::Empty {
                    key: "RENTAL_API_BASE_URL",
                })
            }
            Some(url) => url.trim().trim_end_matches('/').to_string(),
            None => defaults.base_url,
        };

        let session_file = lookup("RENTAL_SESSION_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.session_file);

        let timeout = match lookup("RENTAL_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("RENTAL_HTTP_TIMEOUT_SECS", &raw)?),
            None => defaults.timeout,
        };

        let payment_delay = match lookup("RENTAL_PAYMENT_DELAY_MS") {
            Some(raw) => Duration::from_millis(parse_number("RENTAL_PAYMENT_DELAY_MS", &raw)?),
            None => defaults.payment_delay,
        };

        Ok(Self {
            base_url,
            session_file,
            timeout,
            payment_delay,
        })
    }
}

fn parse_number(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })
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
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.payment_delay, Duration::from_millis(2500));
    }

    #[test]
    fn overrides_are_applied_and_trailing_slash_dropped() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("RENTAL_API_BASE_URL", "https://rent.example.com/api/"),
            ("RENTAL_HTTP_TIMEOUT_SECS", "5"),
            ("RENTAL_PAYMENT_DELAY_MS", "0"),
            ("RENTAL_SESSION_FILE", "/tmp/s.json"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://rent.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.payment_delay, Duration::ZERO);
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = ClientConfig::from_lookup(lookup_from(&[("RENTAL_HTTP_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                key: "RENTAL_HTTP_TIMEOUT_SECS",
                ..
            }
        ));
    }
}
