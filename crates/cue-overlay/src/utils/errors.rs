//! Error types for layout

use thiserror::Error;

use cue_core::CoreError;

/// Layout error types
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Invalid dimensions provided
    #[error("invalid dimensions: container width and height must be positive")]
    InvalidDimensions,

    /// Cue-model failure surfaced through layout
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Internal consistency error (should not happen)
    #[error("internal layout error: {0}")]
    Internal(String),
}

impl LayoutError {
    /// Create an internal consistency error
    pub fn internal<T: core::fmt::Display>(message: T) -> Self {
        Self::Internal(message.to_string())
    }
}
