//! Transport failure taxonomy.

use thiserror::Error;

/// Failures reported by a metering transport.
///
/// The set is closed; transports must map their internal failures onto one of
/// these variants. The aggregator recovers from all of them locally and never
/// propagates them to callers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The metered-stream identifier was rejected by the remote service.
    #[error("invalid metered stream identifier")]
    InvalidIdentifier,

    /// The request could not be authenticated.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The underlying stream cannot be resumed (e.g. it already expired).
    #[error("stream cannot be resumed")]
    ResumeNotPossible,

    /// Any failure outside the closed taxonomy.
    #[error("unknown transport error")]
    Unknown,
}
