//! Background job scheduler.
//!
//! Registers the recurring feed-refresh job at server startup.

use std::sync::Arc;

use phishdb_pipeline::{CycleReport, PipelineError, Refresher};
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    refresher: Arc<Refresher>,
    last_report: Arc<RwLock<Option<CycleReport>>>,
    refresh_cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(refresh_cron, move |_uuid, _lock| {
        let refresher = Arc::clone(&refresher);
        let last_report = Arc::clone(&last_report);

        Box::pin(async move {
            tracing::info!("scheduler: starting feed refresh");
            run_refresh_job(&refresher, &last_report).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

/// Drive one scheduled refresh cycle, logging rather than failing the job.
async fn run_refresh_job(refresher: &Refresher, last_report: &RwLock<Option<CycleReport>>) {
    match refresher.run().await {
        Ok(report) => {
            tracing::info!(
                corpus = report.corpus_records,
                new = report.new_records,
                failed_sources = report.failed_sources(),
                "scheduler: refresh complete"
            );
            *last_report.write().await = Some(report);
        }
        Err(PipelineError::RefreshInProgress) => {
            tracing::warn!("scheduler: refresh already running, skipping this tick");
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: refresh failed to publish");
        }
    }
}
