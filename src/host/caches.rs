//! Named-cache storage capability.

use anyhow::Result;
use async_trait::async_trait;

/// Storage of named caches the host maintains for previously fetched
/// responses.
///
/// Optional capability, same contract as
/// [`crate::host::WorkerRegistry`]: absence is a no-op branch.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Enumerate the names of all caches currently present.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Delete one named cache. Returns whether the host reported the
    /// cache as deleted.
    async fn delete(&self, name: &str) -> Result<bool>;
}
