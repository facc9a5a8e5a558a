//! Adapter boundary types.

use phishdb_core::{FeedSource, ThreatRecord};
use serde::Serialize;

/// Outcome class of one adapter fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    /// Fetched and every row parsed.
    Ok,
    /// Fetched, but some malformed rows were discarded.
    Partial,
    /// The source contributed nothing this cycle.
    Failed,
}

impl FetchStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FetchStatus::Ok => "ok",
            FetchStatus::Partial => "partial",
            FetchStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one adapter contributed to a refresh cycle.
#[derive(Debug, Clone)]
pub struct FeedBatch {
    pub source: FeedSource,
    /// Normalized records, deduplicated keep-first within the batch.
    pub records: Vec<ThreatRecord>,
    pub status: FetchStatus,
    /// Data rows seen on the wire, including later-discarded ones.
    pub fetched: usize,
    /// Malformed rows dropped during parsing.
    pub discarded: usize,
    pub error: Option<String>,
}

impl FeedBatch {
    pub(crate) fn failed(source: FeedSource, error: String) -> Self {
        Self {
            source,
            records: Vec::new(),
            status: FetchStatus::Failed,
            fetched: 0,
            discarded: 0,
            error: Some(error),
        }
    }
}

/// Rows produced by one adapter before batch-level dedup.
pub(crate) struct ParsedRows {
    pub records: Vec<ThreatRecord>,
    pub fetched: usize,
    pub discarded: usize,
}
