//! Core Configuration Utilities
//!
//! Construction-time validation. Invalid settings fail fast with a
//! descriptive error instead of surfacing as runtime misbehavior.

use std::time::Duration;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid capacity: {0}")]
    InvalidCapacity(String),

    #[error("Invalid TTL value: {0}")]
    InvalidTtl(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration conflict: {0}")]
    Conflict(String),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` variant describing the first invalid
    /// setting encountered.
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a byte capacity is usable
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidCapacity` if the capacity is zero.
    pub fn validate_capacity(bytes: u64, name: &str) -> ConfigResult<()> {
        if bytes == 0 {
            return Err(ConfigurationError::InvalidCapacity(format!(
                "{name} must be greater than zero"
            )));
        }
        Ok(())
    }

    /// Validate a time-to-live duration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidTtl` if the TTL is zero, since an
    /// entry must always expire strictly after it was created.
    pub fn validate_ttl(ttl: Duration, name: &str) -> ConfigResult<()> {
        if ttl.is_zero() {
            return Err(ConfigurationError::InvalidTtl(format!(
                "{name} must be greater than zero"
            )));
        }
        Ok(())
    }

    /// Validate a non-zero duration parameter
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidParameter` if the duration is zero.
    pub fn validate_non_zero(duration: Duration, name: &str) -> ConfigResult<()> {
        if duration.is_zero() {
            return Err(ConfigurationError::InvalidParameter(format!(
                "{name} cannot be zero"
            )));
        }
        Ok(())
    }
}
