//! Refresh-cycle reporting types.

use chrono::{DateTime, Utc};
use phishdb_core::FeedSource;
use phishdb_feeds::{FeedBatch, FetchStatus};
use serde::Serialize;

/// Per-source outcome of one refresh cycle.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: FeedSource,
    pub status: FetchStatus,
    /// Data rows seen on the wire.
    pub fetched: usize,
    /// Rows contributed to the merge after in-batch dedup.
    pub kept: usize,
    /// Malformed rows discarded during parsing.
    pub discarded: usize,
    pub error: Option<String>,
}

impl From<&FeedBatch> for SourceReport {
    fn from(batch: &FeedBatch) -> Self {
        Self {
            source: batch.source,
            status: batch.status,
            fetched: batch.fetched,
            kept: batch.records.len(),
            discarded: batch.discarded,
            error: batch.error.clone(),
        }
    }
}

/// Outcome of one end-to-end refresh cycle.
///
/// A cycle with failed sources is still an overall success — the corpus was
/// refreshed from whatever sources answered.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sources: Vec<SourceReport>,
    /// Records in the corpus before this cycle.
    pub prior_records: usize,
    /// Records contributed by this cycle's fetches, after in-batch dedup.
    pub fresh_records: usize,
    /// Records in the corpus after this cycle.
    pub corpus_records: usize,
    /// URLs never seen before this cycle.
    pub new_records: usize,
}

impl CycleReport {
    #[must_use]
    pub fn failed_sources(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| s.status == FetchStatus::Failed)
            .count()
    }
}
