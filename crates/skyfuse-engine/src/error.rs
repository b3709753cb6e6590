//! Error types for the fusion engine.

use skyfuse_core::CoreError;
use thiserror::Error;

/// A specialized `Result` type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Top-level error type for the fusion engine.
///
/// Nothing here is fatal to the process: malformed frames are dropped,
/// classifier failures leave the last-known classification in place, and
/// only posting to an engine that has already shut down is unrecoverable.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EngineError {
    /// Core validation error
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// A raw feed frame could not be decoded or normalized
    #[error("Malformed frame: {reason}")]
    MalformedFrame {
        /// Why the frame was rejected
        reason: String,
    },

    /// The external classifier call failed
    #[error("Classifier '{name}' failed: {message}")]
    Classifier {
        /// Name of the classifier implementation
        name: String,
        /// Failure description
        message: String,
    },

    /// Audit sink I/O error
    #[error("Audit sink error: {0}")]
    Audit(#[from] std::io::Error),

    /// The engine event queue is closed (the engine has shut down)
    #[error("Engine queue closed: {context}")]
    ChannelClosed {
        /// What was being posted when the queue was found closed
        context: &'static str,
    },
}

impl EngineError {
    /// Creates a new malformed frame error.
    #[must_use]
    pub fn malformed_frame(reason: impl Into<String>) -> Self {
        Self::MalformedFrame {
            reason: reason.into(),
        }
    }

    /// Creates a new classifier error.
    #[must_use]
    pub fn classifier(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Classifier {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a new channel closed error.
    #[must_use]
    pub const fn channel_closed(context: &'static str) -> Self {
        Self::ChannelClosed { context }
    }

    /// Returns `true` if this error is recoverable.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Core(e) => e.is_recoverable(),
            Self::MalformedFrame { .. } | Self::Classifier { .. } | Self::Audit(_) => true,
            Self::ChannelClosed { .. } => false,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedFrame {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_error_display() {
        let err = EngineError::classifier("rule", "connection refused");
        assert!(err.to_string().contains("rule"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_recoverability() {
        assert!(EngineError::malformed_frame("bad json").is_recoverable());
        assert!(EngineError::classifier("rule", "boom").is_recoverable());
        assert!(!EngineError::channel_closed("radar observation").is_recoverable());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: EngineError = parse_err.into();
        assert!(matches!(err, EngineError::MalformedFrame { .. }));
    }
}
