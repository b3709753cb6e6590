//! Error types for the SkyFuse core crate.
//!
//! This module provides error handling using [`thiserror`] for automatic
//! `Display` and `Error` trait implementations.
//!
//! # Example
//!
//! ```rust
//! use skyfuse_core::error::{CoreError, CoreResult};
//!
//! fn check_latitude(lat: f64) -> CoreResult<f64> {
//!     if !lat.is_finite() {
//!         return Err(CoreError::invalid_observation("latitude is not finite"));
//!     }
//!     Ok(lat)
//! }
//! ```

use thiserror::Error;

/// A specialized `Result` type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Top-level error type for the SkyFuse core crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CoreError {
    /// An observation failed boundary validation and was not admitted.
    #[error("Invalid observation: {reason}")]
    InvalidObservation {
        /// Description of what was wrong with the observation
        reason: String,
    },

    /// A value failed domain validation.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of what validation failed
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
    },
}

impl CoreError {
    /// Creates a new invalid observation error.
    #[must_use]
    pub fn invalid_observation(reason: impl Into<String>) -> Self {
        Self::InvalidObservation {
            reason: reason.into(),
        }
    }

    /// Creates a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// A rejected observation is recoverable: the caller drops it and keeps
    /// processing the stream. Validation and configuration errors indicate a
    /// programming or deployment mistake and are not.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidObservation { .. } => true,
            Self::Validation { .. } | Self::Configuration { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_observation_display() {
        let err = CoreError::invalid_observation("latitude missing");
        assert!(err.to_string().contains("Invalid observation"));
        assert!(err.to_string().contains("latitude missing"));
    }

    #[test]
    fn test_recoverability() {
        assert!(CoreError::invalid_observation("x").is_recoverable());
        assert!(!CoreError::validation("x").is_recoverable());
        assert!(!CoreError::configuration("x").is_recoverable());
    }
}
