//! Result records produced by revision and purge passes.

use serde::Serialize;

/// Outcome of one synchronous revision pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// Version token appended to every rewritten reference.
    pub version: String,
    /// Number of elements actually mutated.
    pub updated_count: usize,
    /// Always `true`: the pass is best-effort over independently
    /// skippable elements and has no failure path of its own.
    pub success: bool,
}

/// Outcome of a lifecycle-aware revision entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// The document was ready and the pass ran immediately.
    Ran(RunResult),
    /// The document was still loading; the pass was queued for
    /// [`crate::AssetRevisioner::document_ready`].
    Deferred,
}

/// What a completed deep purge touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeReport {
    /// Background-worker registrations unregistered.
    pub unregistered_workers: usize,
    /// Named caches deleted.
    pub deleted_caches: usize,
    /// URL the navigator was asked to replace the current entry with.
    pub target: String,
}

/// Resolution of [`crate::AssetRevisioner::purge_and_reload`].
///
/// The purge never propagates an error: a failure anywhere in the
/// unregister/delete/navigate sequence degrades to a plain revision with
/// a forced reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// Every purge step completed and the navigation was issued.
    Purged(PurgeReport),
    /// A purge step failed; the fallback revision ran instead.
    Fallback {
        /// Rendered error chain of the step that failed.
        reason: String,
        /// Result of the fallback revision pass.
        run: RunResult,
    },
}

impl PurgeOutcome {
    /// Returns `true` when the deep purge completed without falling back.
    pub fn is_purged(&self) -> bool {
        matches!(self, Self::Purged(_))
    }
}
