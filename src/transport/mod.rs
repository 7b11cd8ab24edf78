//! Metering transport capability boundary.
//!
//! The aggregator drives underlying metered streams exclusively through the
//! [`MeterTransport`] trait. Implementations typically wrap network calls:
//! commands may be slow, complete asynchronously, and report failures through
//! one-shot callbacks that can fire on any thread.

mod error;

pub use error::TransportError;

use crate::session::{MeterStream, SessionStatus};

/// One-shot failure callback for asynchronous transport commands.
///
/// Invoked at most once, on an arbitrary thread. Not being invoked means the
/// command succeeded.
pub type ErrorCallback = Box<dyn FnOnce(TransportError) + Send + 'static>;

/// Capability interface over the underlying metering service.
///
/// All methods return immediately; `begin`, `resume`, and
/// `trigger_periodic_event` report failures through their callback instead.
/// The transport is the source of truth for each stream's runtime status and
/// enforces the per-kind maximum validity span
/// ([`SessionKind::max_stream_span`](crate::session::SessionKind::max_stream_span)),
/// expiring streams on its own.
pub trait MeterTransport: Send + Sync {
    /// Report the current status of `stream`.
    fn status(&self, stream: MeterStream) -> SessionStatus;

    /// Start a new underlying stream.
    fn begin(&self, stream: MeterStream, on_error: ErrorCallback);

    /// Suspend a running stream.
    fn pause(&self, stream: MeterStream);

    /// Resume a paused stream.
    fn resume(&self, stream: MeterStream, on_error: ErrorCallback);

    /// Tear down a stream.
    fn stop(&self, stream: MeterStream);

    /// Emit the one-shot periodic billing event. Best-effort.
    fn trigger_periodic_event(&self, on_error: ErrorCallback);

    /// Token to attach to outbound service requests billed against `stream`.
    fn token_if_valid(&self, stream: MeterStream) -> String;
}

/// A transport that meters nothing.
///
/// Every stream reports [`SessionStatus::Stopped`], commands are ignored, and
/// tokens are empty. Lets embedders disable metering without branching at
/// every call site.
#[derive(Debug, Default)]
pub struct NoopTransport;

impl MeterTransport for NoopTransport {
    fn status(&self, _stream: MeterStream) -> SessionStatus {
        SessionStatus::Stopped
    }

    fn begin(&self, _stream: MeterStream, _on_error: ErrorCallback) {}

    fn pause(&self, _stream: MeterStream) {}

    fn resume(&self, _stream: MeterStream, _on_error: ErrorCallback) {}

    fn stop(&self, _stream: MeterStream) {}

    fn trigger_periodic_event(&self, _on_error: ErrorCallback) {}

    fn token_if_valid(&self, _stream: MeterStream) -> String {
        String::new()
    }
}
