//! HTTP handlers for all web routes.

pub mod api;
pub mod batch;
pub mod dashboard;
pub mod predict;

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::render::MAIN_CSS;
use crate::state::AppState;

/// Render a page template, or a bare 500 page if rendering fails.
pub(crate) fn page<S: Serialize>(state: &AppState, template: &str, ctx: S) -> Response {
    match state.templates.render(template, ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(template, error = %e, "Template rendering failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Internal error</h1><p>The page could not be rendered.</p>".to_string()),
            )
                .into_response()
        }
    }
}

pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], MAIN_CSS)
}
