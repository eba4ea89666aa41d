//! Core error types for cue-rs cross-module error handling
//!
//! Provides the main `CoreError` enum used across the crate. Parsing of
//! external caption data is deliberately tolerant — individual malformed cue
//! blocks are dropped rather than surfaced — so these variants cover the few
//! hard failures: absent input, API misuse, and internal invariant breaks.

use thiserror::Error;

/// Main error type for cue-core operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Top-level parser input was empty or whitespace-only
    #[error("caption input is empty")]
    EmptyInput,

    /// A track kind name was not recognized
    #[error("unknown track kind: '{0}'")]
    UnknownKind(String),

    /// Unrecoverable parse failure (not used for malformed cue blocks,
    /// which are silently dropped)
    #[error("parse error: {0}")]
    Parse(String),

    /// Internal consistency error (should not happen)
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Create a parse error from a message
    pub fn parse<T: core::fmt::Display>(message: T) -> Self {
        Self::Parse(message.to_string())
    }

    /// Create an internal consistency error
    pub fn internal<T: core::fmt::Display>(message: T) -> Self {
        Self::Internal(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(CoreError::EmptyInput.to_string(), "caption input is empty");
        assert_eq!(
            CoreError::UnknownKind("zalgo".into()).to_string(),
            "unknown track kind: 'zalgo'"
        );
        assert_eq!(CoreError::parse("bad").to_string(), "parse error: bad");
    }
}
