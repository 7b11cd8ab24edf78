//! Session-kind taxonomy and metered-stream mapping.

use std::fmt;
use std::time::Duration;

/// Classification of a logical session.
///
/// The set is closed: every logical session is one of these kinds, fixed at
/// creation. The kind selects the underlying [`MeterStream`] and the priority
/// used when tagging outbound service requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// Continuous guided activity (e.g. an active turn-by-turn trip).
    Guided,
    /// Passive background tracking.
    Passive,
}

/// Identifier of an underlying metered stream.
///
/// One stream exists per variant; all logical sessions whose kind maps to the
/// same stream share it. The transport layer owns the stream's runtime status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeterStream {
    /// Billing event stream for guided activity.
    GuidedTrip,
    /// Billing event stream for passive tracking.
    PassiveTrace,
}

impl SessionKind {
    /// The metered stream this kind bills against.
    ///
    /// The mapping is a pure function; several kinds may collapse to one
    /// stream, in which case they share its lifecycle.
    pub const fn stream(self) -> MeterStream {
        match self {
            SessionKind::Guided => MeterStream::GuidedTrip,
            SessionKind::Passive => MeterStream::PassiveTrace,
        }
    }

    /// All kinds, highest outbound-request priority first.
    pub const fn by_priority() -> [SessionKind; 2] {
        [SessionKind::Guided, SessionKind::Passive]
    }

    /// Maximum validity span of one underlying stream of this kind.
    ///
    /// Enforced by the transport layer, which expires the stream on its own;
    /// the aggregator re-begins lazily when it next observes the stream
    /// not running.
    pub const fn max_stream_span(self) -> Duration {
        match self {
            SessionKind::Guided => Duration::from_secs(12 * 60 * 60),
            SessionKind::Passive => Duration::from_secs(60 * 60),
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Guided => f.write_str("guided"),
            SessionKind::Passive => f.write_str("passive"),
        }
    }
}

impl fmt::Display for MeterStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeterStream::GuidedTrip => f.write_str("guided-trip"),
            MeterStream::PassiveTrace => f.write_str("passive-trace"),
        }
    }
}
