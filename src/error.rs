//! Error types for session-meter.

use thiserror::Error;

/// Main error type for session-meter operations.
///
/// Transport-level failures are handled internally by the aggregator and
/// never surface here; see [`crate::transport::TransportError`] for that
/// taxonomy.
#[derive(Error, Debug)]
pub enum MeterError {
    /// The session registry lock was poisoned by a panicking thread.
    #[error("session registry lock poisoned")]
    LockPoisoned,

    /// Failed to read a configuration file.
    #[error("failed to read config file: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Failed to parse a configuration file.
    #[error("failed to parse config file: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Convenience Result type for session-meter operations.
pub type Result<T> = std::result::Result<T, MeterError>;
