//! Refresh-cycle orchestration.
//!
//! One refresh cycle: fetch the four feeds concurrently, join, merge the
//! batches with the prior corpus single-threaded, and publish atomically.
//! A source failure costs that source's contribution; only a publish
//! failure fails the cycle.

mod refresh;
mod report;

use thiserror::Error;

pub use refresh::Refresher;
pub use report::{CycleReport, SourceReport};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Another refresh cycle holds the single-writer lock.
    #[error("a refresh cycle is already running")]
    RefreshInProgress,

    /// Publish failed after a successful merge. The previously published
    /// corpus remains authoritative.
    #[error("failed to publish corpus: {0}")]
    Publish(#[from] phishdb_store::StoreError),
}
