//! Refresh trigger and cycle-report endpoints.

use axum::{extract::State, Json};
use phishdb_pipeline::{CycleReport, PipelineError};

use super::{ApiError, AppState};

/// Kick off a refresh cycle and return its report.
///
/// Overlapping requests are rejected with 409 rather than queued — exactly
/// one writer may be publishing at a time.
pub(super) async fn trigger(
    State(state): State<AppState>,
) -> Result<Json<CycleReport>, ApiError> {
    match state.refresher.run().await {
        Ok(report) => {
            *state.last_report.write().await = Some(report.clone());
            Ok(Json(report))
        }
        Err(PipelineError::RefreshInProgress) => Err(ApiError::new(
            "conflict",
            "a refresh cycle is already running",
        )),
        Err(e) => {
            tracing::error!(error = %e, "refresh cycle failed to publish");
            Err(ApiError::new(
                "internal_error",
                "refresh failed to publish; the previous corpus remains authoritative",
            ))
        }
    }
}

/// Report of the most recent completed refresh cycle, if any.
pub(super) async fn last(State(state): State<AppState>) -> Json<Option<CycleReport>> {
    Json(state.last_report.read().await.clone())
}
