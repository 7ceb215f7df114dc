//! Startup failures.
//!
//! Everything after boot degrades per gesture (rollback or reload). Only a
//! page that cannot be wired at all surfaces a `BootError`, which is logged
//! once and leaves the server-rendered page working without the client.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

#[derive(Debug, thiserror::Error)]
pub enum BootError {
    #[error("no document to attach to")]
    NoDocument,
    #[error("listener for {event} not installed: {detail}")]
    Listener { event: &'static str, detail: String },
    #[error("search panel mount point #{0} missing")]
    MountPoint(&'static str),
}

impl BootError {
    /// Whether the client can still run with reduced features.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::MountPoint(_))
    }
}
