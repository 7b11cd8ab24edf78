//! Logical-session model.
//!
//! This module provides the types the aggregator tracks sessions with:
//! identifiers, the kind taxonomy and its metered-stream mapping, status
//! values, per-session records, and the registry that holds them.

mod id;
mod kind;
mod record;
mod registry;
mod state;

pub use id::SessionId;
pub use kind::{MeterStream, SessionKind};
pub use record::LogicalSession;
pub use registry::SessionRegistry;
pub use state::SessionStatus;
