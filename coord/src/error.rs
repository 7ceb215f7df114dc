//! Error types for the coordination core.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures and non-2xx responses are distinct variants only so
//! logs can show the status; every caller routes them down the same rollback
//! path. A missing DOM node during apply or rollback is its own type because
//! the only safe recovery is a full reload.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// A confirming request did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server rejected mutation: {status}")]
    Rejected { status: u16 },
}

impl MutationError {
    /// HTTP status for diagnostics, when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(_) => None,
            Self::Rejected { status } => Some(*status),
        }
    }
}

/// The DOM no longer matches what a mutation expected to find.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("dom inconsistency: {what}")]
pub struct DomInconsistency {
    pub what: String,
}

impl DomInconsistency {
    pub fn new(what: impl Into<String>) -> Self {
        Self { what: what.into() }
    }
}

/// A search request could not produce results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(String),
    #[error("search failed: {status}")]
    Rejected { status: u16 },
    #[error("search response unreadable: {0}")]
    Decode(String),
}

/// Runtime configuration could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),
}

/// Whether an HTTP status counts as success.
#[must_use]
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
