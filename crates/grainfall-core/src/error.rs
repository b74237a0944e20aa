//! Error types for grid construction and configuration

use thiserror::Error;

/// Errors raised when building a grid or validating configuration
///
/// Nothing in the steady-state simulation returns these; out-of-bounds
/// access is absorbed silently instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("grid of {width}x{height} cells does not fit in memory")]
    GridTooLarge { width: i32, height: i32 },

    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}
