//! JSON endpoints mirroring the pages, for scripts and monitoring.

use axum::{extract::State, http::StatusCode, Json};
use oncolens_common::error::ApiErrorResponse;
use oncolens_common::{categorize, CategorizedFeatures, ModelMetricRecord, ScoreTier};
use serde::Serialize;

use crate::state::SharedState;
use crate::view::LoadState;

#[derive(Debug, Serialize)]
pub struct RankedModel {
    pub rank: usize,
    #[serde(flatten)]
    pub record: ModelMetricRecord,
    pub tier: ScoreTier,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub top_model: Option<ModelMetricRecord>,
    pub models: Vec<RankedModel>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub backend: &'static str,
    pub base_url: String,
}

/// GET /api/metrics: models ranked by ROC-AUC.
pub async fn api_metrics(State(state): State<SharedState>) -> Result<Json<MetricsResponse>, ApiErrorResponse> {
    let view = state.dashboard();
    view.load_metrics().await;

    match view.snapshot() {
        LoadState::Ready(metrics) => Ok(Json(MetricsResponse {
            top_model: metrics.top_model().cloned(),
            models: metrics
                .records
                .into_iter()
                .enumerate()
                .map(|(i, record)| RankedModel {
                    rank: i + 1,
                    tier: ScoreTier::for_score(record.roc_auc),
                    record,
                })
                .collect(),
        })),
        LoadState::Error(msg) => Err(ApiErrorResponse::bad_gateway(msg)),
        LoadState::Loading => Err(ApiErrorResponse::internal("Metrics request did not complete")),
    }
}

/// GET /api/features: expected features grouped by category.
pub async fn api_features(State(state): State<SharedState>) -> Result<Json<CategorizedFeatures>, ApiErrorResponse> {
    let names = state
        .api
        .features()
        .await
        .map_err(|e| ApiErrorResponse::bad_gateway(format!("Could not load features: {}", e.user_message())))?;
    Ok(Json(categorize(&names)))
}

/// GET /api/health: whether the prediction backend answers.
pub async fn api_health(State(state): State<SharedState>) -> Result<Json<HealthResponse>, ApiErrorResponse> {
    let base_url = state.config.backend.base_url.clone();
    match state.api.health().await {
        Ok(h) if h.is_ok() => Ok(Json(HealthResponse { backend: "ok", base_url })),
        Ok(h) => Err(ApiErrorResponse::new(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Backend at {base_url} reported status {:?}", h.status),
        )),
        Err(e) => Err(ApiErrorResponse::new(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Backend at {base_url} unreachable: {}", e.user_message()),
        )),
    }
}
