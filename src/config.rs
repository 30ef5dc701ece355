//! Configuration management for the registration validator.
//!
//! This module loads settings from environment variables, reading a `.env`
//! file first when one is present. Every setting has a default, so an empty
//! environment yields a working configuration.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::time::Duration;

/// Public ViaCEP endpoint.
pub const DEFAULT_VIACEP_BASE_URL: &str = "https://viacep.com.br/ws";

/// Configuration for the postal-code registry and logging.
#[derive(Debug, Clone)]
pub struct Config {
    /// ViaCEP base URL (default: https://viacep.com.br/ws)
    pub viacep_base_url: String,

    /// HTTP request timeout in seconds (default: 5)
    pub request_timeout: u64,

    /// How long registry answers stay cached, in minutes (default: 60)
    /// Zero disables the cache.
    pub cep_cache_ttl_minutes: u64,

    /// Log level (default: "warn")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `VIACEP_BASE_URL`: registry base URL, must be http(s)
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds, must be > 0 (default: 5)
    /// - `CEP_CACHE_TTL_MINUTES`: cache TTL in minutes (default: 60)
    /// - `LOG_LEVEL`: Logging level (default: "warn")
    pub fn from_env() -> ConfigResult<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let viacep_base_url =
            env::var("VIACEP_BASE_URL").unwrap_or_else(|_| DEFAULT_VIACEP_BASE_URL.to_string());

        if !viacep_base_url.starts_with("http://") && !viacep_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "VIACEP_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 5)?;
        if request_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                var: "REQUEST_TIMEOUT".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let cep_cache_ttl_minutes = Self::parse_env_u64("CEP_CACHE_TTL_MINUTES", 60)?;
        if cep_cache_ttl_minutes.checked_mul(60).is_none() {
            return Err(ConfigError::InvalidValue {
                var: "CEP_CACHE_TTL_MINUTES".to_string(),
                reason: format!("Too large, got: {}", cep_cache_ttl_minutes),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Ok(Config {
            viacep_base_url,
            request_timeout,
            cep_cache_ttl_minutes,
            log_level,
        })
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Cache TTL in seconds. Saturates for values `from_env` would reject.
    pub fn cache_ttl_secs(&self) -> u64 {
        self.cep_cache_ttl_minutes.saturating_mul(60)
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            viacep_base_url: DEFAULT_VIACEP_BASE_URL.to_string(),
            request_timeout: 5,
            cep_cache_ttl_minutes: 60,
            log_level: "warn".to_string(),
        }
    }
}
