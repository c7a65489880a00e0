//! Precondition and enumeration error types.

use thiserror::Error;

/// Errors raised while validating a [`crate::DeployConfig`]. These are
/// precondition errors: they must be surfaced to the caller before the
/// state machine starts, and never reach the orchestrator core.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("chunk-ratio ({chunk_ratio}) must be >= canary-ratio ({canary_ratio})")]
    ChunkRatioTooSmall { canary_ratio: f64, chunk_ratio: f64 },

    #[error("{field} ({value}) must be in [0, 1]")]
    RatioOutOfRange { field: &'static str, value: f64 },

    #[error("timeout must be positive, got {0}")]
    NonPositiveTimeout(u64),
}

/// Errors raised while enumerating services from a glob pattern.
#[derive(Debug, Error)]
pub enum EnumerateError {
    #[error("invalid glob pattern {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },

    #[error("failed to read supervision directory entry: {0}")]
    Io(#[from] std::io::Error),
}
