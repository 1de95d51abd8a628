// src/backend/config.rs
use crate::error::PortfolioError;
use crate::utils::crypto::DEFAULT_PBKDF2_ITERATIONS;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

pub const CONTENT_URL_VAR: &str = "PORTFOLIO_JSON_URL";
pub const STORE_PATH_VAR: &str = "PORTFOLIO_STORE_PATH";
pub const PBKDF2_ITERATIONS_VAR: &str = "PORTFOLIO_PBKDF2_ITERATIONS";
pub const IDLE_TIMEOUT_VAR: &str = "PORTFOLIO_IDLE_TIMEOUT_MS";
pub const IDLE_POLL_VAR: &str = "PORTFOLIO_IDLE_POLL_MS";
pub const HTTP_TIMEOUT_VAR: &str = "PORTFOLIO_HTTP_TIMEOUT_SECS";

// Default values (used when the variable is unset)
const DEFAULT_IDLE_TIMEOUT_MS: u64 = 10 * 60 * 1000; // 10 minutes
const DEFAULT_IDLE_POLL_MS: u64 = 1_500;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Deserialize, Validate, Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Remote content source. `None` is a user-visible configuration error, not a failure to start.
    #[validate(url)]
    pub content_url: Option<String>,
    /// File backing the durable store; in-memory when unset.
    pub store_path: Option<PathBuf>,
    #[validate(range(min = 1))]
    pub pbkdf2_iterations: u32,
    #[validate(range(min = 1))]
    pub idle_timeout_ms: u64,
    #[validate(range(min = 1))]
    pub idle_poll_ms: u64,
    #[validate(range(min = 1))]
    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content_url: None,
            store_path: None,
            pbkdf2_iterations: DEFAULT_PBKDF2_ITERATIONS,
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            idle_poll_ms: DEFAULT_IDLE_POLL_MS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, PortfolioError> {
    value
        .trim()
        .parse()
        .map_err(|_| PortfolioError::InvalidInput(format!("{} must be a positive integer, got {:?}", name, value)))
}

impl AppConfig {
    pub fn from_env() -> Result<Self, PortfolioError> {
        Self::from_vars(std::env::vars())
    }

    /// Builds the configuration from `(name, value)` pairs. Empty values count as unset.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, PortfolioError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (name, value) in vars {
            let (name, value) = (name.as_ref(), value.as_ref().trim());
            if value.is_empty() {
                continue;
            }
            match name {
                CONTENT_URL_VAR => config.content_url = Some(value.to_string()),
                STORE_PATH_VAR => config.store_path = Some(PathBuf::from(value)),
                PBKDF2_ITERATIONS_VAR => config.pbkdf2_iterations = parse_number(name, value)?,
                IDLE_TIMEOUT_VAR => config.idle_timeout_ms = parse_number(name, value)?,
                IDLE_POLL_VAR => config.idle_poll_ms = parse_number(name, value)?,
                HTTP_TIMEOUT_VAR => config.http_timeout_secs = parse_number(name, value)?,
                _ => {}
            }
        }
        config
            .validate()
            .map_err(|e| PortfolioError::InvalidInput(e.to_string()))?;
        if config.content_url.is_none() {
            tracing::warn!("{} is not set; the placeholder document will be served", CONTENT_URL_VAR);
        }
        Ok(config)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn idle_poll_interval(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.idle_timeout(), Duration::from_secs(600));
        assert_eq!(config.pbkdf2_iterations, 140_000);
    }

    #[test]
    fn reads_known_variables() {
        let config = AppConfig::from_vars([
            (CONTENT_URL_VAR, "https://raw.example.com/portfolio.json"),
            (STORE_PATH_VAR, "/tmp/portfolio.cbor"),
            (PBKDF2_ITERATIONS_VAR, "2000"),
            (IDLE_TIMEOUT_VAR, "30000"),
            ("UNRELATED", "x"),
        ])
        .unwrap();
        assert_eq!(config.content_url.as_deref(), Some("https://raw.example.com/portfolio.json"));
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/portfolio.cbor")));
        assert_eq!(config.pbkdf2_iterations, 2000);
        assert_eq!(config.idle_timeout_ms, 30_000);
    }

    #[test]
    fn empty_url_counts_as_missing() {
        let config = AppConfig::from_vars([(CONTENT_URL_VAR, "  ")]).unwrap();
        assert_eq!(config.content_url, None);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            AppConfig::from_vars([(CONTENT_URL_VAR, "not a url")]),
            Err(PortfolioError::InvalidInput(_))
        ));
        assert!(matches!(
            AppConfig::from_vars([(IDLE_POLL_VAR, "soon")]),
            Err(PortfolioError::InvalidInput(_))
        ));
        assert!(matches!(
            AppConfig::from_vars([(PBKDF2_ITERATIONS_VAR, "0")]),
            Err(PortfolioError::InvalidInput(_))
        ));
    }
}
