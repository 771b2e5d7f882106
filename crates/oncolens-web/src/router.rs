//! Axum router: maps all URL paths to handlers.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    api::{api_features, api_health, api_metrics},
    batch::{batch_page, batch_submit},
    dashboard::{dashboard, dashboard_retry},
    predict::{predict_page, predict_submit},
    stylesheet,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",                get(dashboard))
        .route("/dashboard",       get(dashboard))
        .route("/dashboard/retry", post(dashboard_retry))
        .route("/predict",         get(predict_page).post(predict_submit))
        .route("/predict/batch",   get(batch_page).post(batch_submit))

        // API endpoints
        .route("/api/metrics",  get(api_metrics))
        .route("/api/features", get(api_features))
        .route("/api/health",   get(api_health))

        // Assets
        .route("/assets/main.css", get(stylesheet))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
