//! The refresh driver: fetch → merge → publish, one writer at a time.

use std::sync::Arc;

use chrono::Utc;
use phishdb_core::merge;
use phishdb_feeds::{fetch_all_feeds, FeedClient};
use phishdb_store::Store;
use tokio::sync::Mutex;

use crate::report::{CycleReport, SourceReport};
use crate::PipelineError;

/// Drives refresh cycles against a shared [`Store`].
///
/// Holds the single-writer lock: overlapping refresh requests are rejected
/// with [`PipelineError::RefreshInProgress`] rather than queued, so a slow
/// cycle cannot pile up writers behind it. Readers are unaffected — they go
/// straight to the store.
pub struct Refresher {
    client: FeedClient,
    store: Arc<Store>,
    lock: Mutex<()>,
}

impl Refresher {
    #[must_use]
    pub fn new(client: FeedClient, store: Arc<Store>) -> Self {
        Self {
            client,
            store,
            lock: Mutex::new(()),
        }
    }

    /// Run one refresh cycle.
    ///
    /// The four adapters run as concurrent tasks; each degrades to a failed
    /// batch on its own timeout or error without disturbing the others. After
    /// the join point the merge runs synchronously — keep-first dedup needs
    /// one deterministic total order over all contributing rows. There is no
    /// mid-cycle cancellation: the cycle either publishes or fails before
    /// publishing, leaving the previous corpus intact.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::RefreshInProgress`] if another cycle is running.
    /// - [`PipelineError::Publish`] if the store cannot be written. This is
    ///   the only hard cycle failure.
    pub async fn run(&self) -> Result<CycleReport, PipelineError> {
        let Ok(_guard) = self.lock.try_lock() else {
            return Err(PipelineError::RefreshInProgress);
        };

        let started_at = Utc::now();
        tracing::info!("starting refresh cycle");

        let batches = fetch_all_feeds(&self.client).await;
        let sources: Vec<SourceReport> = batches.iter().map(SourceReport::from).collect();

        let prior = match self.store.load_corpus().await {
            Ok(prior) => prior,
            Err(e) => {
                // Unreadable table: recover from the snapshot if one exists,
                // otherwise treat this as a cold start with an empty baseline.
                tracing::warn!(error = %e, "prior corpus unavailable from table; trying snapshot");
                self.store.load_snapshot().unwrap_or_default()
            }
        };
        let prior_records = prior.len();

        let mut fresh = Vec::new();
        for batch in batches {
            fresh.extend(batch.records);
        }
        let fresh_records = fresh.len();

        let corpus = merge(fresh, prior);

        // An empty merge result means every source failed on a cold start.
        // Publishing it would overwrite nothing useful, but skipping keeps
        // "empty store" impossible to mistake for a published corpus.
        if corpus.is_empty() {
            tracing::warn!("merge produced an empty corpus; skipping publish");
        } else {
            self.store.publish(&corpus).await?;
        }

        let report = CycleReport {
            started_at,
            finished_at: Utc::now(),
            sources,
            prior_records,
            fresh_records,
            corpus_records: corpus.len(),
            new_records: corpus.len().saturating_sub(prior_records),
        };
        tracing::info!(
            corpus = report.corpus_records,
            new = report.new_records,
            failed_sources = report.failed_sources(),
            "refresh cycle complete"
        );
        Ok(report)
    }
}
