//! Error types for pruning, attack and training operations.
//!
//! Every failure in this crate is fatal to the current step: nothing is
//! retried, and partially rewritten masks are not rolled back.

use thiserror::Error;

/// Result type alias for advprune operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the pruner, the PGD attack and the training driver.
#[derive(Debug, Error)]
pub enum Error {
    /// Pruning granularity name is not one of `weight` or `unit`.
    #[error("Pruning type not implemented: {0} (must be one of: weight, unit)")]
    UnsupportedPruneType(String),

    /// Ramp curve name is not one of `linear`, `half_cycle` or `full_cycle`.
    #[error("Ramp type not implemented: {0} (must be one of: linear, half_cycle, full_cycle)")]
    UnsupportedRampType(String),

    /// A configuration value failed eager validation.
    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// Removal fraction outside `[0, 1]` or not finite.
    #[error("Invalid pruning fraction: {0} (must be finite and in [0.0, 1.0])")]
    InvalidFraction(f32),

    /// Tensor shape mismatch between a weight and its mask, or an input and its gradient.
    #[error("Tensor shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch { expected: Vec<usize>, actual: Vec<usize> },

    /// Malformed batch (label count, rank, feature count).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The model could not produce a gradient for the attack or update.
    #[error("Gradient computation failed: {0}")]
    Gradient(String),

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error in a run configuration.
    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create an invalid-config error for `field`.
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig { field: field.into(), message: message.into() }
    }

    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Check if this error stems from user-supplied configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedPruneType(_)
                | Error::UnsupportedRampType(_)
                | Error::InvalidConfig { .. }
                | Error::Yaml(_)
        )
    }
}
