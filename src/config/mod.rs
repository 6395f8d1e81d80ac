//! Configuration for the employee screen and the mock API.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::repository::DEFAULT_PAGE_SIZE;

/// A variable was set to something unusable.
#[derive(Debug, Error)]
#[error("invalid value {value:?} for {key}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the employee API, e.g. `http://127.0.0.1:8080/api`
    pub api_url: String,
    /// Page size requested when listing
    pub page_size: usize,
    /// Timeout applied to every API request
    pub request_timeout: Duration,
    /// Address the mock API binds to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log line format (text, json)
    pub log_format: LogFormat,
    /// Seed the mock API with the sample employees
    pub seed_sample: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_url = env::var("PAYROLL_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080/api".to_string());

        let page_size = parse_var("PAYROLL_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;

        let request_timeout =
            Duration::from_secs(parse_var("PAYROLL_REQUEST_TIMEOUT_SECS", 30u64)?);

        let bind_addr = parse_var(
            "PAYROLL_BIND_ADDR",
            SocketAddr::from(([127, 0, 0, 1], 8080)),
        )?;

        let log_level = env::var("PAYROLL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = parse_var("PAYROLL_LOG_FORMAT", LogFormat::Text)?;

        let seed_sample = parse_var("PAYROLL_SEED_SAMPLE", true)?;

        Ok(Self {
            api_url,
            page_size,
            request_timeout,
            bind_addr,
            log_level,
            log_format,
            seed_sample,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError { key, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases share the process environment, so they run in one test.
    #[test]
    fn test_config_from_env() {
        for key in [
            "PAYROLL_API_URL",
            "PAYROLL_PAGE_SIZE",
            "PAYROLL_REQUEST_TIMEOUT_SECS",
            "PAYROLL_BIND_ADDR",
            "PAYROLL_LOG_LEVEL",
            "PAYROLL_LOG_FORMAT",
            "PAYROLL_SEED_SAMPLE",
        ] {
            env::remove_var(key);
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.api_url, "http://127.0.0.1:8080/api");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.seed_sample);

        env::set_var("PAYROLL_LOG_FORMAT", "JSON");
        assert_eq!(Config::from_env().unwrap().log_format, LogFormat::Json);
        env::set_var("PAYROLL_LOG_FORMAT", "xml");
        assert_eq!(Config::from_env().unwrap_err().key, "PAYROLL_LOG_FORMAT");
        env::remove_var("PAYROLL_LOG_FORMAT");

        env::set_var("PAYROLL_PAGE_SIZE", "lots");
        let err = Config::from_env().unwrap_err();
        assert_eq!(err.key, "PAYROLL_PAGE_SIZE");
        assert_eq!(err.value, "lots");
        env::remove_var("PAYROLL_PAGE_SIZE");
    }
}
