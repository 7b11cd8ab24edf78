//! Session status values.

/// Runtime status of a metered session.
///
/// Used both for the transport's report on an underlying stream and for the
/// aggregator's view of a logical session (absent from the registry means
/// `Stopped`; present means `Paused` or `Running` per its pause flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Not running; billable events are not accruing.
    #[default]
    Stopped,
    /// Suspended; may be resumed without starting a new stream.
    Paused,
    /// Actively accruing billable events.
    Running,
}

impl SessionStatus {
    /// Check whether the session is actively running.
    pub fn is_running(&self) -> bool {
        matches!(self, SessionStatus::Running)
    }

    /// Check whether the session is alive (running or paused).
    pub fn is_live(&self) -> bool {
        !matches!(self, SessionStatus::Stopped)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Stopped => f.write_str("stopped"),
            SessionStatus::Paused => f.write_str("paused"),
            SessionStatus::Running => f.write_str("running"),
        }
    }
}
