// SPDX-License-Identifier: MIT

//! Engine and server configuration, read from the environment
//!
//! | Variable                       | Default     |
//! |--------------------------------|-------------|
//! | `VERDICT_HOST`                 | `127.0.0.1` |
//! | `VERDICT_PORT`                 | `8080`      |
//! | `VERDICT_ENTRY_NODE`           | `start`     |
//! | `VERDICT_MAX_STEPS`            | unbounded   |
//! | `VERDICT_REQUEST_TIMEOUT_SECS` | `30`        |

use std::str::FromStr;
use std::time::Duration;

use crate::engine::ENTRY_NODE;
use crate::error::VerdictError;

/// Traversal settings
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Node the traversal starts from
    pub entry_node: String,
    /// Optional ceiling on visited nodes. `None` keeps the unbounded
    /// behaviour, where a cyclic policy never terminates.
    pub max_steps: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entry_node: ENTRY_NODE.to_string(),
            max_steps: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, VerdictError> {
        let config = Self {
            entry_node: std::env::var("VERDICT_ENTRY_NODE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| ENTRY_NODE.to_string()),
            max_steps: env_parse("VERDICT_MAX_STEPS")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn validate(&self) -> Result<(), VerdictError> {
        if self.max_steps == Some(0) {
            return Err(VerdictError::config("max steps must be at least 1"));
        }
        Ok(())
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a single evaluation, enforced by the transport
    pub request_timeout: Duration,
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(30),
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, VerdictError> {
        let defaults = Self::default();
        Ok(Self {
            host: std::env::var("VERDICT_HOST").unwrap_or(defaults.host),
            port: env_parse("VERDICT_PORT")?.unwrap_or(defaults.port),
            request_timeout: env_parse::<u64>("VERDICT_REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            engine: EngineConfig::from_env()?,
        })
    }

    /// Socket address string for binding
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, VerdictError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => parse_value(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, VerdictError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| VerdictError::config(format!("invalid {}={:?}: {}", key, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.entry_node, "start");
        assert_eq!(config.max_steps, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_max_steps_rejected() {
        let config = EngineConfig::default().with_max_steps(Some(0));
        assert!(matches!(config.validate(), Err(VerdictError::Config(_))));
    }

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u16>("VERDICT_PORT", " 9090 ").unwrap(), 9090);
        let err = parse_value::<u16>("VERDICT_PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("VERDICT_PORT"));
    }
}
