//! Authoritative registry of logical sessions.

use std::collections::HashMap;

use super::{LogicalSession, MeterStream, SessionId, SessionKind};

/// In-memory mapping from session ID to logical-session record.
///
/// The registry carries no lock of its own: the aggregator owns one instance
/// behind its mutex and performs every mutation and decision-read under a
/// single acquisition. Aggregate queries are keyed by [`MeterStream`] so that
/// kinds sharing one underlying stream are counted together.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, LogicalSession>,
}

impl SessionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record for `id`, or revive the existing one.
    ///
    /// An existing record only has its pause flag cleared; its kind is kept
    /// even when `kind` differs (kinds are immutable once created). Returns
    /// the record so the caller can inspect the effective kind.
    pub fn upsert(&mut self, id: SessionId, kind: SessionKind) -> &mut LogicalSession {
        let record = self
            .sessions
            .entry(id)
            .or_insert_with(|| LogicalSession::new(kind));
        record.set_paused(false);
        record
    }

    /// Remove the record for `id`, returning it if present.
    pub fn remove(&mut self, id: &SessionId) -> Option<LogicalSession> {
        self.sessions.remove(id)
    }

    /// Set the pause flag on `id`, returning the updated record if present.
    pub fn set_paused(&mut self, id: &SessionId, paused: bool) -> Option<&LogicalSession> {
        let record = self.sessions.get_mut(id)?;
        record.set_paused(paused);
        Some(record)
    }

    /// Look up the record for `id`.
    pub fn get(&self, id: &SessionId) -> Option<&LogicalSession> {
        self.sessions.get(id)
    }

    /// Does any alive session bill against `stream`?
    pub fn has_any_on(&self, stream: MeterStream) -> bool {
        self.sessions.values().any(|s| s.kind().stream() == stream)
    }

    /// Does any alive, unpaused session bill against `stream`?
    pub fn has_any_unpaused_on(&self, stream: MeterStream) -> bool {
        self.sessions
            .values()
            .any(|s| s.kind().stream() == stream && !s.is_paused())
    }

    /// Whether the registry holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Number of alive sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// The session kind to tag outbound service requests with.
    ///
    /// Policy: the highest-priority kind with any alive session wins, paused
    /// or not; `None` when the registry is empty.
    pub fn preferred_kind(&self) -> Option<SessionKind> {
        SessionKind::by_priority()
            .into_iter()
            .find(|kind| self.sessions.values().any(|s| s.kind() == *kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_and_get() {
        let mut registry = SessionRegistry::new();
        registry.upsert("a".into(), SessionKind::Guided);

        let record = registry.get(&"a".into()).unwrap();
        assert_eq!(record.kind(), SessionKind::Guided);
        assert!(!record.is_paused());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_upsert_existing_clears_pause_only() {
        let mut registry = SessionRegistry::new();
        registry.upsert("a".into(), SessionKind::Guided);
        registry.set_paused(&"a".into(), true);

        // Re-begin with a different kind: pause cleared, kind unchanged
        let record = registry.upsert("a".into(), SessionKind::Passive);
        assert_eq!(record.kind(), SessionKind::Guided);
        assert!(!record.is_paused());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut registry = SessionRegistry::new();
        registry.upsert("a".into(), SessionKind::Passive);

        let removed = registry.remove(&"a".into()).unwrap();
        assert_eq!(removed.kind(), SessionKind::Passive);
        assert!(registry.is_empty());
        assert!(registry.remove(&"a".into()).is_none());
    }

    #[test]
    fn test_set_paused_unknown_id() {
        let mut registry = SessionRegistry::new();
        assert!(registry.set_paused(&"ghost".into(), true).is_none());
    }

    #[test]
    fn test_stream_queries() {
        let mut registry = SessionRegistry::new();
        assert!(!registry.has_any_on(MeterStream::GuidedTrip));

        registry.upsert("a".into(), SessionKind::Guided);
        registry.upsert("b".into(), SessionKind::Guided);
        assert!(registry.has_any_on(MeterStream::GuidedTrip));
        assert!(!registry.has_any_on(MeterStream::PassiveTrace));
        assert!(registry.has_any_unpaused_on(MeterStream::GuidedTrip));

        registry.set_paused(&"a".into(), true);
        assert!(registry.has_any_unpaused_on(MeterStream::GuidedTrip));

        registry.set_paused(&"b".into(), true);
        assert!(registry.has_any_on(MeterStream::GuidedTrip));
        assert!(!registry.has_any_unpaused_on(MeterStream::GuidedTrip));
    }

    #[test]
    fn test_preferred_kind_priority() {
        let mut registry = SessionRegistry::new();
        assert_eq!(registry.preferred_kind(), None);

        registry.upsert("p".into(), SessionKind::Passive);
        assert_eq!(registry.preferred_kind(), Some(SessionKind::Passive));

        registry.upsert("g".into(), SessionKind::Guided);
        assert_eq!(registry.preferred_kind(), Some(SessionKind::Guided));

        // Paused sessions still count towards preference
        registry.set_paused(&"g".into(), true);
        assert_eq!(registry.preferred_kind(), Some(SessionKind::Guided));

        registry.remove(&"g".into());
        assert_eq!(registry.preferred_kind(), Some(SessionKind::Passive));
    }
}
