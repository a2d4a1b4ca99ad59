use std::collections::HashMap;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

use crate::datasource::binance::DEFAULT_BASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_addr: IpAddr,
    pub binance_api_url: String,
    /// Interval between exchange clock syncs. Zero disables periodic resync.
    pub time_sync_interval_ms: u64,
    pub session_ttl_ms: u64,
    pub http_timeout_ms: u64,
    pub retry_max_elapsed_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 3031,
            bind_addr: IpAddr::from([127, 0, 0, 1]),
            binance_api_url: DEFAULT_BASE_URL.to_string(),
            time_sync_interval_ms: 3_600_000,
            session_ttl_ms: 86_400_000,
            http_timeout_ms: 10_000,
            retry_max_elapsed_ms: 30_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = parse_or(&env_map, "PORT", defaults.port, "must be a valid u16")?;
        let bind_addr = parse_or(
            &env_map,
            "BIND_ADDR",
            defaults.bind_addr,
            "must be an IP address",
        )?;

        let binance_api_url = match env_map.get("BINANCE_API_URL").map(|s| s.trim()) {
            None | Some("") => defaults.binance_api_url,
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.to_string()
            }
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "BINANCE_API_URL".to_string(),
                    format!("must start with http:// or https://, got {}", other),
                ))
            }
        };

        let time_sync_interval_ms = parse_or(
            &env_map,
            "TIME_SYNC_INTERVAL_MS",
            defaults.time_sync_interval_ms,
            "must be a valid u64",
        )?;

        let session_ttl_ms = parse_or(
            &env_map,
            "SESSION_TTL_MS",
            defaults.session_ttl_ms,
            "must be a valid u64",
        )?;
        if session_ttl_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let http_timeout_ms = parse_or(
            &env_map,
            "HTTP_TIMEOUT_MS",
            defaults.http_timeout_ms,
            "must be a valid u64",
        )?;
        let retry_max_elapsed_ms = parse_or(
            &env_map,
            "RETRY_MAX_ELAPSED_MS",
            defaults.retry_max_elapsed_ms,
            "must be a valid u64",
        )?;

        Ok(Config {
            port,
            bind_addr,
            binance_api_url,
            time_sync_interval_ms,
            session_ttl_ms,
            http_timeout_ms,
            retry_max_elapsed_ms,
        })
    }
}

fn parse_or<T: FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: T,
    expectation: &str,
) -> Result<T, ConfigError> {
    match env_map.get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(key.to_string(), expectation.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_empty() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config.port, 3031);
        assert_eq!(config.binance_api_url, "https://fapi.binance.com");
        assert_eq!(config.time_sync_interval_ms, 3_600_000);
        assert_eq!(config.session_ttl_ms, 86_400_000);
        assert_eq!(config.bind_addr, IpAddr::from([127, 0, 0, 1]));
    }

    #[test]
    fn test_overrides() {
        let mut env_map = HashMap::new();
        env_map.insert("PORT".to_string(), "8080".to_string());
        env_map.insert("BIND_ADDR".to_string(), "0.0.0.0".to_string());
        env_map.insert(
            "BINANCE_API_URL".to_string(),
            "https://testnet.binancefuture.com".to_string(),
        );
        env_map.insert("TIME_SYNC_INTERVAL_MS".to_string(), "0".to_string());

        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.binance_api_url, "https://testnet.binancefuture.com");
        assert_eq!(config.time_sync_interval_ms, 0);
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = HashMap::new();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_api_url() {
        let mut env_map = HashMap::new();
        env_map.insert("BINANCE_API_URL".to_string(), "fapi.binance.com".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "BINANCE_API_URL"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_zero_session_ttl_rejected() {
        let mut env_map = HashMap::new();
        env_map.insert("SESSION_TTL_MS".to_string(), "0".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "SESSION_TTL_MS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
