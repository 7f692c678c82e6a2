//! Orchestrator applying version markers to asset references and, when
//! asked, purging the host's deeper caching layers.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tracing::{error, info};

use crate::config::ReviseConfig;
use crate::host::{
    CacheStorage, Clock, DocumentReadiness, MarkupSurface, Navigator, ScriptElement,
    SystemClock, WorkerRegistry,
};
use crate::models::{LifecycleOutcome, PurgeOutcome, PurgeReport, RunResult};

/// Query parameter carrying the version token on rewritten references.
const VERSION_PARAM: &str = "v";

/// Query parameter marking a purge navigation.
const PURGE_PARAM: &str = "_nuke";

/// Settle time between a pass and its scheduled reload, so in-flight
/// mutations and diagnostics land before navigation.
const RELOAD_DELAY: Duration = Duration::from_millis(100);

/// Applies version markers to a document's asset references so clients
/// fetch fresh copies instead of cached ones.
///
/// The revisioner owns the non-document host capabilities; the document
/// itself is passed into each operation. Worker-registry and
/// cache-storage capabilities are optional and only consulted by
/// [`purge_and_reload`](Self::purge_and_reload).
pub struct AssetRevisioner {
    navigator: Box<dyn Navigator>,
    clock: Box<dyn Clock>,
    workers: Option<Box<dyn WorkerRegistry>>,
    caches: Option<Box<dyn CacheStorage>>,
    pending: Vec<ReviseConfig>,
}

impl AssetRevisioner {
    /// Create a revisioner over the given navigation surface, using the
    /// system clock.
    pub fn new(navigator: Box<dyn Navigator>) -> Self {
        Self {
            navigator,
            clock: Box::new(SystemClock),
            workers: None,
            caches: None,
            pending: Vec::new(),
        }
    }

    /// Replace the clock capability.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach a background-worker registry for deep purges.
    pub fn with_worker_registry(mut self, workers: Box<dyn WorkerRegistry>) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Attach a named-cache storage for deep purges.
    pub fn with_cache_storage(mut self, caches: Box<dyn CacheStorage>) -> Self {
        self.caches = Some(caches);
        self
    }

    /// Rewrite the document's asset references with a version marker.
    ///
    /// Stylesheet links are rewritten in place; marked scripts are
    /// replaced wholesale so the host re-executes them. An element whose
    /// reference already equals the target is left alone and not counted.
    /// The pass is best-effort and always reports success: elements
    /// missing a usable reference are skipped, never raised.
    pub fn revise(&mut self, document: &mut dyn MarkupSurface, config: &ReviseConfig) -> RunResult {
        let version = config.version_token(self.clock.as_ref());
        if config.verbose {
            info!(version = %version, "revising asset references");
        }

        let mut updated_count = 0;

        if config.update_css {
            for stylesheet in document.stylesheets() {
                let target = versioned_reference(&stylesheet.href, &version);
                if stylesheet.href != target {
                    document.set_stylesheet_href(stylesheet.id, &target);
                    updated_count += 1;
                    if config.verbose {
                        info!(from = %stylesheet.href, to = %target, "updated stylesheet reference");
                    }
                }
            }
        }

        if config.update_js {
            for script in document.busted_scripts() {
                let target = versioned_reference(&script.src, &version);
                if script.src != target {
                    let replacement = ScriptElement {
                        src: target.clone(),
                        attributes: script
                            .attributes
                            .iter()
                            .filter(|attribute| !attribute.is_named("src"))
                            .cloned()
                            .collect(),
                    };
                    document.replace_script(script.id, replacement);
                    updated_count += 1;
                    if config.verbose {
                        info!(from = %script.src, to = %target, "replaced script element");
                    }
                }
            }
        }

        if config.verbose {
            info!(updated_count, "asset revision complete");
        }

        if config.force_reload {
            self.navigator.schedule_reload(RELOAD_DELAY);
        }

        RunResult {
            version,
            updated_count,
            success: true,
        }
    }

    /// Revise once the document's initial parse has completed.
    ///
    /// A still-loading document queues the configuration; the host is
    /// expected to drive [`document_ready`](Self::document_ready) from
    /// its load event. A ready document is revised immediately. This
    /// makes the operation safe to call before markup is guaranteed to
    /// exist.
    pub fn revise_when_ready(
        &mut self,
        document: &mut dyn MarkupSurface,
        config: ReviseConfig,
    ) -> LifecycleOutcome {
        match document.readiness() {
            DocumentReadiness::Loading => {
                self.pending.push(config);
                LifecycleOutcome::Deferred
            }
            DocumentReadiness::Ready => LifecycleOutcome::Ran(self.revise(document, &config)),
        }
    }

    /// Load-time entry point: [`revise_when_ready`](Self::revise_when_ready)
    /// with the default configuration, intended to be invoked once as a
    /// startup side effect by the embedding host.
    pub fn auto_revise(&mut self, document: &mut dyn MarkupSurface) -> LifecycleOutcome {
        self.revise_when_ready(document, ReviseConfig::default())
    }

    /// Run every revision queued while the document was loading, in
    /// submission order. Hosts call this from their load event.
    pub fn document_ready(&mut self, document: &mut dyn MarkupSurface) -> Vec<RunResult> {
        let pending = std::mem::take(&mut self.pending);
        pending
            .iter()
            .map(|config| self.revise(&mut *document, config))
            .collect()
    }

    /// Unregister all background workers, delete all named caches and
    /// replace the current location with a purge-marked URL.
    ///
    /// Each capability batch is awaited as an all-or-nothing join: one
    /// failed sub-operation short-circuits the rest of its batch. Absent
    /// capabilities are skipped. Any actual failure is logged and
    /// degrades to a plain revision with a forced reload, so the caller
    /// always gets a cache-busted reload and never an error.
    pub async fn purge_and_reload(&mut self, document: &mut dyn MarkupSurface) -> PurgeOutcome {
        match self.deep_purge().await {
            Ok(report) => PurgeOutcome::Purged(report),
            Err(cause) => {
                error!(error = %format!("{cause:#}"), "deep purge failed, falling back to revision with reload");
                let config = ReviseConfig {
                    force_reload: true,
                    ..ReviseConfig::default()
                };
                PurgeOutcome::Fallback {
                    reason: format!("{cause:#}"),
                    run: self.revise(document, &config),
                }
            }
        }
    }

    async fn deep_purge(&mut self) -> Result<PurgeReport> {
        let mut unregistered_workers = 0;
        if let Some(registry) = self.workers.as_deref() {
            let registrations = registry
                .registrations()
                .await
                .context("failed to enumerate worker registrations")?;
            let removals = try_join_all(
                registrations
                    .iter()
                    .map(|registration| registry.unregister(registration)),
            )
            .await
            .context("failed to unregister workers")?;
            unregistered_workers = removals.len();
        }

        let mut deleted_caches = 0;
        if let Some(storage) = self.caches.as_deref() {
            let names = storage
                .keys()
                .await
                .context("failed to enumerate cache names")?;
            let deletions = try_join_all(names.iter().map(|name| storage.delete(name)))
                .await
                .context("failed to delete caches")?;
            deleted_caches = deletions.len();
        }

        let target = purge_target(&self.navigator.location(), self.clock.now_millis());
        self.navigator
            .replace(&target)
            .context("failed to replace the current location")?;

        Ok(PurgeReport {
            unregistered_workers,
            deleted_caches,
            target,
        })
    }
}

/// Reference with any prior query string stripped and the version marker
/// appended. Old query parameters are discarded, not merged.
fn versioned_reference(reference: &str, version: &str) -> String {
    let clean = reference
        .split_once('?')
        .map_or(reference, |(head, _)| head);
    format!("{clean}?{VERSION_PARAM}={version}")
}

/// Current location with query and fragment stripped, a purge marker
/// appended, and the original fragment re-appended after the marker.
fn purge_target(location: &str, timestamp: u64) -> String {
    let without_query = location
        .split_once('?')
        .map_or(location, |(head, _)| head);
    let base = without_query
        .split_once('#')
        .map_or(without_query, |(head, _)| head);
    let fragment = location.find('#').map_or("", |index| &location[index..]);
    format!("{base}?{PURGE_PARAM}={timestamp}{fragment}")
}
