use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::parser::parse;
use crate::cache::SnapshotCache;
use crate::config::SheetSourceConfig;
use crate::errors::{SourceError, SourceResult};
use crate::models::{RefreshStatus, RefreshSummary, Snapshot};
use crate::sources::SheetFetcher;

/// Periodically reloads one spreadsheet into a [`SnapshotCache`].
///
/// The first cycle runs as soon as [`RefreshScheduler::start`] is called and
/// then every `refresh_interval`. A failed cycle is logged and recorded in
/// [`RefreshStatus`]; nothing is published, so readers keep the last good
/// snapshot. The loop only ends through [`RefreshScheduler::stop`].
pub struct RefreshScheduler {
    label: String,
    source: SheetSourceConfig,
    fetcher: Arc<dyn SheetFetcher>,
    cache: Arc<SnapshotCache>,
    status: ArcSwap<RefreshStatus>,
    /// Serializes load cycles; never taken by readers
    refresh_lock: tokio::sync::Mutex<()>,
    started: AtomicBool,
    cancellation_token: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    pub fn new(
        label: impl Into<String>,
        source: SheetSourceConfig,
        fetcher: Arc<dyn SheetFetcher>,
        cache: Arc<SnapshotCache>,
    ) -> Self {
        Self {
            label: label.into(),
            source,
            fetcher,
            cache,
            status: ArcSwap::from_pointee(RefreshStatus::default()),
            refresh_lock: tokio::sync::Mutex::new(()),
            started: AtomicBool::new(false),
            cancellation_token: CancellationToken::new(),
            handle: Mutex::new(None),
        }
    }

    pub fn cache(&self) -> &Arc<SnapshotCache> {
        &self.cache
    }

    pub fn status(&self) -> Arc<RefreshStatus> {
        self.status.load_full()
    }

    /// Spawn the background loop. Returns `false` if it was already started
    /// or has been stopped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self: &Arc<Self>) -> bool {
        if self.cancellation_token.is_cancelled() {
            debug!("Refresh scheduler for '{}' was stopped; not starting", self.label);
            return false;
        }
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("Refresh scheduler for '{}' already started", self.label);
            return false;
        }

        info!(
            "Starting refresh scheduler for '{}' (sheet {}, interval {})",
            self.label,
            self.source.sheet_id,
            humantime::format_duration(self.source.refresh_interval)
        );

        let scheduler = Arc::clone(self);
        let handle = tokio::spawn(async move { scheduler.run().await });
        *self.handle.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        true
    }

    /// Cancel the background loop and wait for it to exit.
    ///
    /// The published snapshot stays readable. A stopped scheduler cannot be
    /// started again.
    pub async fn stop(&self) {
        self.cancellation_token.cancel();

        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("Refresh scheduler for '{}' ended abnormally: {}", self.label, e);
            }
        }
    }

    async fn run(self: Arc<Self>) {
        let mut ticker = interval(self.source.refresh_interval);
        // A slow fetch pushes the next cycle back instead of bursting
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tokio::select! {
                        _ = self.refresh_now() => {}
                        _ = self.cancellation_token.cancelled() => break,
                    }
                }
                _ = self.cancellation_token.cancelled() => break,
            }
        }

        info!("Refresh scheduler for '{}' stopped", self.label);
    }

    /// Run one load cycle: fetch both worksheets, parse, publish.
    ///
    /// Errors are logged and recorded before being returned; the cache is
    /// only touched on success.
    pub async fn refresh_now(&self) -> SourceResult<RefreshSummary> {
        let _guard = self.refresh_lock.lock().await;
        let attempt_at = Utc::now();

        match self.load().await {
            Ok(summary) => {
                self.record(attempt_at, None);
                Ok(summary)
            }
            Err(e) => {
                error!("Sheets refresh failed for '{}': {}", self.label, e);
                self.record(attempt_at, Some(&e));
                Err(e)
            }
        }
    }

    async fn load(&self) -> SourceResult<RefreshSummary> {
        info!("Refreshing sheets cache for '{}'", self.label);

        let sheet_id = self.source.sheet_id.as_str();
        let (register_rows, catalog_rows) = tokio::try_join!(
            self.fetcher.fetch_rows(sheet_id, self.source.register_worksheet),
            self.fetcher.fetch_rows(sheet_id, self.source.catalog_worksheet),
        )?;

        debug!(
            "Rows loaded for '{}': {} register, {} catalog",
            self.label,
            register_rows.len(),
            catalog_rows.len()
        );

        let dataset = parse(&register_rows, &catalog_rows, &self.source.columns);
        debug!("Header indexes for '{}': {:?}", self.label, dataset.layout);

        let missing = dataset.layout.missing(&self.source.columns);
        if !missing.is_empty() {
            warn!(
                "Register sheet for '{}' is missing columns {:?}; their values default to false/absent",
                self.label, missing
            );
        }

        let generation = self.cache.get().generation + 1;
        let snapshot = Snapshot {
            register: dataset.register,
            catalog: dataset.catalog,
            all_gtins: dataset.all_gtins,
            generation,
            loaded_at: Some(Utc::now()),
        };
        let summary = RefreshSummary {
            generation,
            register_entries: snapshot.register.len(),
            catalog_entries: snapshot.catalog.len(),
        };

        self.cache.publish(snapshot);

        info!(
            "Sheets cache loaded for '{}': {} register, {} catalog/all_gtins (generation {})",
            self.label, summary.register_entries, summary.catalog_entries, generation
        );
        Ok(summary)
    }

    fn record(&self, attempt_at: DateTime<Utc>, error: Option<&SourceError>) {
        let previous = self.status.load();
        let next = match error {
            None => RefreshStatus {
                last_attempt_at: Some(attempt_at),
                last_success_at: Some(Utc::now()),
                last_error: None,
                consecutive_failures: 0,
            },
            Some(e) => RefreshStatus {
                last_attempt_at: Some(attempt_at),
                last_success_at: previous.last_success_at,
                last_error: Some(e.to_string()),
                consecutive_failures: previous.consecutive_failures.saturating_add(1),
            },
        };
        self.status.store(Arc::new(next));
    }
}
