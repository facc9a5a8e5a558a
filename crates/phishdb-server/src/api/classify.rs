//! Single-URL classification endpoint.
//!
//! Thin proxy over the classifier collaborator; it runs independently of
//! the ingestion pipeline and has no effect on the corpus.

use axum::{
    extract::{Query, State},
    Json,
};
use phishdb_classify::Verdict;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ClassifyQuery {
    url: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ClassifyResult {
    url: String,
    verdict: Verdict,
}

pub(super) async fn classify(
    State(state): State<AppState>,
    Query(query): Query<ClassifyQuery>,
) -> Result<Json<ClassifyResult>, ApiError> {
    let Some(classifier) = state.classifier.as_ref() else {
        return Err(ApiError::new(
            "unavailable",
            "no classifier endpoint is configured",
        ));
    };

    match classifier.classify(&query.url).await {
        Ok(verdict) => Ok(Json(ClassifyResult {
            url: query.url,
            verdict,
        })),
        Err(e) => {
            tracing::warn!(error = %e, "classifier call failed");
            Err(ApiError::new("bad_gateway", "classifier call failed"))
        }
    }
}
