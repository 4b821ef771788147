//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::errors::ErrorsConfig;
use super::limits::LimitsConfig;
use super::listen::ListenConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration.
///
/// Every section is optional; an empty file yields [`Config::default`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Listening socket.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Table capacity and buffering bounds.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Error policy.
    #[serde(default)]
    pub errors: ErrorsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorPolicy;
    use std::io::Write;

    #[test]
    fn empty_file_is_default() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.listen.address.port(), 8000);
        assert!(cfg.listen.address.ip().is_loopback());
    }

    #[test]
    fn full_file() {
        let cfg = Config::parse(
            r#"
[listen]
address = "127.0.0.1:9100"
backlog = 128
reuse_address = true

[limits]
max_connections = 16
max_line_bytes = 4096
max_queued_bytes = 65536
read_chunk = 512

[errors]
policy = "strict"
"#,
        )
        .unwrap();
        assert_eq!(cfg.listen.address.port(), 9100);
        assert_eq!(cfg.listen.backlog, 128);
        assert!(cfg.listen.reuse_address);
        assert_eq!(cfg.limits.max_connections, 16);
        assert_eq!(cfg.limits.max_line_bytes, Some(4096));
        assert_eq!(cfg.limits.max_queued_bytes, Some(65536));
        assert_eq!(cfg.limits.read_chunk, 512);
        assert_eq!(cfg.errors.policy, ErrorPolicy::Strict);
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nmax_connections = 3").unwrap();
        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.limits.max_connections, 3);
        assert_eq!(cfg.limits.read_chunk, 2048);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load("/nonexistent/talkerd.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = Config::parse("[listen\naddress = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = Config::parse("[errors]\npolicy = \"lenient\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
