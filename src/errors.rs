// src/errors.rs

// error handling for the window limiter

// dependencies
use thiserror::Error;

/// Errors produced while reading a clock.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The underlying time source could not be read.
    #[error("clock could not be read")]
    Unavailable,
}

/// Error type for rate limiter configuration and waiting.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateLimiterError {
    #[error("limit must be positive")]
    InvalidLimit,

    #[error("interval must be positive")]
    InvalidInterval,

    /// A rate or interval string that does not follow the grammar.
    #[error("malformed rate: {0:?}")]
    InvalidRate(String),

    /// Configuration that could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("rate limiter is not modifiable")]
    Unmodifiable,

    /// A wait was aborted through its `Interrupt`.
    #[error("wait interrupted")]
    Interrupted,

    #[error("clock error: {0}")]
    Clock(#[from] ClockError),
}

/// Result type alias for rate limiter operations.
pub type Result<T> = std::result::Result<T, RateLimiterError>;
