//! Read-side corpus endpoints: aggregation and search.
//!
//! These are the only operations the presentation layer consumes; it never
//! touches the adapters or the merge engine.

use axum::{
    extract::{Query, State},
    Json,
};
use phishdb_core::ThreatRecord;
use phishdb_store::{AggregateColumn, AggregateRow, SearchColumn, SearchMode};
use serde::{Deserialize, Serialize};

use super::{map_store_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct AggregateQuery {
    by: Option<String>,
}

pub(super) async fn aggregate(
    State(state): State<AppState>,
    Query(query): Query<AggregateQuery>,
) -> Result<Json<Vec<AggregateRow>>, ApiError> {
    let column = query
        .by
        .as_deref()
        .unwrap_or("target")
        .parse::<AggregateColumn>()
        .map_err(|e| ApiError::new("bad_request", e))?;

    let rows = state
        .store
        .aggregate(column)
        .await
        .map_err(|e| map_store_error(&e))?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    term: String,
    column: Option<String>,
    mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResult {
    found: bool,
    records: Vec<ThreatRecord>,
}

pub(super) async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResult>, ApiError> {
    let column = query
        .column
        .as_deref()
        .unwrap_or("url")
        .parse::<SearchColumn>()
        .map_err(|e| ApiError::new("bad_request", e))?;
    let mode = query
        .mode
        .as_deref()
        .unwrap_or("exact")
        .parse::<SearchMode>()
        .map_err(|e| ApiError::new("bad_request", e))?;

    let records = state
        .store
        .search(&query.term, column, mode)
        .await
        .map_err(|e| map_store_error(&e))?;

    Ok(Json(SearchResult {
        found: !records.is_empty(),
        records,
    }))
}
