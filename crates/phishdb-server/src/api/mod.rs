mod classify;
mod corpus;
mod refresh;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use phishdb_classify::RemoteClassifier;
use phishdb_pipeline::{CycleReport, Refresher};
use phishdb_store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub refresher: Arc<Refresher>,
    pub classifier: Option<Arc<RemoteClassifier>>,
    /// Report of the most recent completed refresh cycle, for observability.
    pub last_report: Arc<RwLock<Option<CycleReport>>>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code.as_str() {
            "bad_request" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            "bad_gateway" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_store_error(error: &phishdb_store::StoreError) -> ApiError {
    tracing::error!(error = %error, "store query failed");
    ApiError::new("internal_error", "store query failed")
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    corpus_records: i64,
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthData>, ApiError> {
    state.store.ping().await.map_err(|e| map_store_error(&e))?;
    let corpus_records = state.store.count().await.map_err(|e| map_store_error(&e))?;
    Ok(Json(HealthData {
        status: "ok",
        corpus_records,
    }))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/corpus/aggregate", get(corpus::aggregate))
        .route("/api/v1/corpus/search", get(corpus::search))
        .route("/api/v1/refresh", post(refresh::trigger))
        .route("/api/v1/refresh/last", get(refresh::last))
        .route("/api/v1/classify", get(classify::classify))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}
