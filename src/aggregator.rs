//! Metered-session aggregation.
//!
//! Many logical sessions collapse onto a few underlying metered streams: the
//! aggregator begins a stream when the first logical session billing against
//! it appears, pauses it when the last unpaused one pauses, and stops it the
//! moment the last one ends.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error, info, warn};

use crate::config::MeterConfig;
use crate::error::MeterError;
use crate::session::{MeterStream, SessionId, SessionKind, SessionRegistry, SessionStatus};
use crate::transport::{MeterTransport, TransportError};
use crate::Result;

/// Aggregates logical sessions onto underlying metered streams.
///
/// Callable from arbitrary threads. Every operation takes one short,
/// memory-only critical section on the session registry, captures the values
/// a transport call needs, and issues that call only after releasing the
/// lock; the captured values are never re-read. Transport failures are
/// recovered internally and never surface to callers.
///
/// One aggregator exists per process, constructed with its transport
/// injected; handles are cheap to clone and share one registry.
#[derive(Clone)]
pub struct SessionAggregator {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Mutex<SessionRegistry>,
    transport: Arc<dyn MeterTransport>,
    max_recovery_attempts: u32,
}

impl SessionAggregator {
    /// Create an aggregator with default configuration.
    pub fn new(transport: Arc<dyn MeterTransport>) -> Self {
        Self::with_config(transport, MeterConfig::default())
    }

    /// Create an aggregator with explicit configuration.
    pub fn with_config(transport: Arc<dyn MeterTransport>, config: MeterConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Mutex::new(SessionRegistry::new()),
                transport,
                max_recovery_attempts: config.recovery.max_recovery_attempts,
            }),
        }
    }

    /// Begin a logical session.
    ///
    /// Starts the underlying metered stream if the transport reports it not
    /// running. Idempotent per id: re-beginning an existing session clears
    /// its pause state and never duplicates the registry entry.
    pub fn begin(&self, kind: SessionKind, id: SessionId) -> Result<()> {
        Inner::begin_session(&self.inner, kind, id, 0)
    }

    /// Stop a logical session.
    ///
    /// Tears down the underlying stream when this was the last session
    /// billing against it. Unknown ids are ignored, so duplicate or late
    /// stop calls are harmless.
    pub fn stop(&self, id: &SessionId) -> Result<()> {
        let decision = {
            let mut registry = self.inner.lock_registry()?;
            match registry.remove(id) {
                None => {
                    debug!("stop for unknown session {} ignored", id);
                    return Ok(());
                }
                Some(record) => {
                    let stream = record.kind().stream();
                    (stream, registry.has_any_on(stream))
                }
            }
        };

        let (stream, still_needed) = decision;
        if !still_needed && self.inner.transport.status(stream) != SessionStatus::Stopped {
            info!("stopping metered stream {}", stream);
            self.inner.transport.stop(stream);
        }
        Ok(())
    }

    /// Pause a logical session.
    ///
    /// Suspends the underlying stream when this was the last unpaused
    /// session billing against it. Pausing an unknown id is a logged no-op.
    pub fn pause(&self, id: &SessionId) -> Result<()> {
        let (stream, last_unpaused_gone) = {
            let mut registry = self.inner.lock_registry()?;
            let Some(kind) = registry.set_paused(id, true).map(|r| r.kind()) else {
                warn!("pause for unknown session {} ignored", id);
                return Ok(());
            };
            let stream = kind.stream();
            (stream, !registry.has_any_unpaused_on(stream))
        };

        if last_unpaused_gone && self.inner.transport.status(stream) == SessionStatus::Running {
            info!("pausing metered stream {}", stream);
            self.inner.transport.pause(stream);
        }
        Ok(())
    }

    /// Resume a logical session.
    ///
    /// Resumes the underlying stream if the transport reports it paused. A
    /// resume failure is not surfaced: the stream is restarted for this
    /// session instead, bounded by the configured recovery attempts.
    /// Resuming an unknown id is a logged no-op.
    pub fn resume(&self, id: &SessionId) -> Result<()> {
        let kind = {
            let mut registry = self.inner.lock_registry()?;
            match registry.set_paused(id, false).map(|r| r.kind()) {
                None => {
                    warn!("resume for unknown session {} ignored", id);
                    return Ok(());
                }
                Some(kind) => kind,
            }
        };

        let stream = kind.stream();
        if self.inner.transport.status(stream) == SessionStatus::Paused {
            let weak = Arc::downgrade(&self.inner);
            let failed_id = id.clone();
            self.inner.transport.resume(
                stream,
                Box::new(move |err| {
                    if let Some(inner) = weak.upgrade() {
                        Inner::handle_resume_failure(&inner, &failed_id, err);
                    }
                }),
            );
        }
        Ok(())
    }

    /// The aggregator's view of a logical session's status.
    ///
    /// Unknown ids report [`SessionStatus::Stopped`].
    pub fn state(&self, id: &SessionId) -> Result<SessionStatus> {
        let registry = self.inner.lock_registry()?;
        Ok(registry
            .get(id)
            .map(|record| record.status())
            .unwrap_or(SessionStatus::Stopped))
    }

    /// Token to attach to outbound service requests.
    ///
    /// Selects the highest-priority kind with any alive session and asks the
    /// transport for its stream's token; `None` when no session is alive.
    pub fn outbound_token(&self) -> Result<Option<String>> {
        let preferred = {
            let registry = self.inner.lock_registry()?;
            registry.preferred_kind()
        };
        Ok(preferred.map(|kind| self.inner.transport.token_if_valid(kind.stream())))
    }

    /// Number of alive logical sessions.
    pub fn session_count(&self) -> Result<usize> {
        let registry = self.inner.lock_registry()?;
        Ok(registry.len())
    }
}

/// Outcome of a resume-failure recovery decision, computed under the
/// registry lock and executed after release.
enum RecoveryPlan {
    Restart { kind: SessionKind, attempts: u32 },
    GiveUp { stream: MeterStream, still_needed: bool },
}

impl Inner {
    fn lock_registry(&self) -> Result<MutexGuard<'_, SessionRegistry>> {
        self.registry.lock().map_err(|_| MeterError::LockPoisoned)
    }

    /// Shared begin path for caller-driven begins (`attempts == 0`) and
    /// resume-failure recovery restarts.
    fn begin_session(
        inner: &Arc<Inner>,
        kind: SessionKind,
        id: SessionId,
        attempts: u32,
    ) -> Result<()> {
        let effective_kind = {
            let mut registry = inner.lock_registry()?;
            let record = registry.upsert(id.clone(), kind);
            if record.kind() != kind {
                warn!(
                    "session {} re-begun as {} keeps its original kind {}",
                    id,
                    kind,
                    record.kind()
                );
            }
            record.set_recovery_attempts(attempts);
            record.kind()
        };

        let stream = effective_kind.stream();
        if inner.transport.status(stream) != SessionStatus::Running {
            inner.transport.trigger_periodic_event(Box::new(|err| {
                warn!("periodic billing event failed: {}", err);
            }));

            info!("beginning metered stream {}", stream);
            let weak = Arc::downgrade(inner);
            let failed_id = id;
            inner.transport.begin(
                stream,
                Box::new(move |err| {
                    if let Some(inner) = weak.upgrade() {
                        inner.handle_begin_failure(&failed_id, err);
                    }
                }),
            );
        }
        Ok(())
    }

    /// A begin that failed never materialized remotely; discard the record
    /// so a later begin with the same id starts fresh.
    fn handle_begin_failure(&self, id: &SessionId, err: TransportError) {
        error!("metered stream begin failed, discarding session {}: {}", id, err);
        match self.registry.lock() {
            Ok(mut registry) => {
                registry.remove(id);
            }
            Err(_) => error!("session registry lock poisoned during begin recovery"),
        }
    }

    /// Resume failure degrades to restarting the underlying stream for the
    /// affected session, bounded by `max_recovery_attempts`. At the cap the
    /// session is dropped, tearing down the stream if nothing else needs it.
    fn handle_resume_failure(inner: &Arc<Inner>, id: &SessionId, err: TransportError) {
        let plan = {
            let mut registry = match inner.registry.lock() {
                Ok(guard) => guard,
                Err(_) => {
                    error!("session registry lock poisoned during resume recovery");
                    return;
                }
            };
            match registry.remove(id) {
                // Stopped concurrently; nothing left to recover.
                None => return,
                Some(record) => {
                    let attempts = record.recovery_attempts() + 1;
                    if attempts > inner.max_recovery_attempts {
                        let stream = record.kind().stream();
                        RecoveryPlan::GiveUp {
                            stream,
                            still_needed: registry.has_any_on(stream),
                        }
                    } else {
                        RecoveryPlan::Restart {
                            kind: record.kind(),
                            attempts,
                        }
                    }
                }
            }
        };

        match plan {
            RecoveryPlan::Restart { kind, attempts } => {
                warn!(
                    "resume failed for session {} (recovery attempt {}), restarting stream: {}",
                    id, attempts, err
                );
                if let Err(e) = Inner::begin_session(inner, kind, id.clone(), attempts) {
                    error!("failed to restart session {}: {}", id, e);
                }
            }
            RecoveryPlan::GiveUp {
                stream,
                still_needed,
            } => {
                error!(
                    "dropping session {} after exhausting resume recovery: {}",
                    id, err
                );
                if !still_needed && inner.transport.status(stream) != SessionStatus::Stopped {
                    inner.transport.stop(stream);
                }
            }
        }
    }
}
