//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("limits.max_connections must be at least 1")]
    ZeroCapacity,
    #[error("limits.read_chunk must be at least 1")]
    ZeroReadChunk,
    #[error("limits.max_line_bytes must be at least 1 when set")]
    ZeroLineBound,
    #[error("limits.max_queued_bytes must be at least 1 when set")]
    ZeroQueueBound,
    #[error("listen.backlog must be at least 1")]
    ZeroBacklog,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.limits.max_connections == 0 {
        errors.push(ValidationError::ZeroCapacity);
    }
    if config.limits.read_chunk == 0 {
        errors.push(ValidationError::ZeroReadChunk);
    }
    if config.limits.max_line_bytes == Some(0) {
        errors.push(ValidationError::ZeroLineBound);
    }
    if config.limits.max_queued_bytes == Some(0) {
        errors.push(ValidationError::ZeroQueueBound);
    }
    if config.listen.backlog == 0 {
        errors.push(ValidationError::ZeroBacklog);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
