//! Logical-session identifier type.

use std::fmt;

/// Opaque identifier for a logical session.
///
/// Identifiers are supplied by the caller and must be unique for the life of
/// the session; the aggregator never generates or interprets them. A UUID
/// string is typical, but any non-empty token works.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session ID from a caller-supplied token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// View the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for SessionId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
