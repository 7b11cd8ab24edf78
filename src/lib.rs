//! # session-meter
//!
//! Multi-tenant metered-session aggregation for usage billing.
//!
//! This crate tracks any number of independently-started logical sessions,
//! grouped by a small session-kind taxonomy, and drives a much smaller set of
//! underlying metered streams through a pluggable transport: a stream runs
//! exactly while at least one logical session billing against it is alive,
//! and is torn down the instant the last one ends.
//!
//! ## Features
//!
//! - **Aggregation**: many logical sessions collapse onto one underlying
//!   begin/pause/resume/stop call stream per metered identifier
//! - **Thread-safe**: callable from arbitrary threads; one short, memory-only
//!   critical section per operation, transport calls always outside the lock
//! - **Self-healing**: failed stream resumes degrade to a bounded automatic
//!   restart instead of surfacing errors to callers
//! - **Pluggable transport**: the metering service is a capability trait,
//!   injected at construction; tests substitute a fake the same way
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use session_meter::{NoopTransport, SessionAggregator, SessionId, SessionKind};
//!
//! fn main() -> session_meter::Result<()> {
//!     // Swap NoopTransport for a real metering transport in production
//!     let aggregator = SessionAggregator::new(Arc::new(NoopTransport));
//!
//!     let trip = SessionId::from("trip-1");
//!     aggregator.begin(SessionKind::Guided, trip.clone())?;
//!     assert!(aggregator.state(&trip)?.is_running());
//!
//!     aggregator.pause(&trip)?;
//!     aggregator.resume(&trip)?;
//!     aggregator.stop(&trip)?;
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use aggregator::SessionAggregator;
pub use config::MeterConfig;
pub use error::{MeterError, Result};
pub use session::{
    LogicalSession, MeterStream, SessionId, SessionKind, SessionRegistry, SessionStatus,
};
pub use transport::{ErrorCallback, MeterTransport, NoopTransport, TransportError};
