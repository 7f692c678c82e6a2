//! Background-worker registry capability.

use anyhow::Result;
use async_trait::async_trait;

/// One background-worker registration known to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRegistration {
    /// Scope URL the worker was registered under.
    pub scope: String,
}

/// Registry of background workers the host currently tracks.
///
/// Optional capability: hosts without worker support simply never attach
/// one, which the purge treats as a no-op branch rather than an error.
#[async_trait]
pub trait WorkerRegistry: Send + Sync {
    /// Enumerate all current registrations.
    async fn registrations(&self) -> Result<Vec<WorkerRegistration>>;

    /// Unregister one registration. Returns whether the host reported the
    /// registration as removed.
    async fn unregister(&self, registration: &WorkerRegistration) -> Result<bool>;
}
