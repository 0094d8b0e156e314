use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::catalog::CatalogSource;
use super::domain::ScreenerSubmission;
use super::service::{ScreenerService, ScreenerServiceError};

/// Router builder exposing the questionnaire and its scoring endpoint.
///
/// Catalog sources may touch the filesystem, so handlers run the service on
/// the blocking pool.
pub fn screener_router<S>(service: Arc<ScreenerService<S>>) -> Router
where
    S: CatalogSource + 'static,
{
    Router::new()
        .route("/api/screener", get(form_handler::<S>))
        .route("/api/screener/", get(form_handler::<S>))
        .route("/api/screener/submit", post(submit_handler::<S>))
        .with_state(service)
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<ScreenerService<S>>>,
    axum::Json(submission): axum::Json<ScreenerSubmission>,
) -> Response
where
    S: CatalogSource + 'static,
{
    let result = tokio::task::spawn_blocking(move || service.submit(&submission))
        .await
        .unwrap_or_else(|err| Err(err.into()));

    match result {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn form_handler<S>(State(service): State<Arc<ScreenerService<S>>>) -> Response
where
    S: CatalogSource + 'static,
{
    let result = tokio::task::spawn_blocking(move || service.form())
        .await
        .unwrap_or_else(|err| Err(err.into()));

    match result {
        Ok(form) => (StatusCode::OK, axum::Json(form)).into_response(),
        Err(err) => service_error_response(err),
    }
}

fn service_error_response(err: ScreenerServiceError) -> Response {
    let payload = json!({
        "detail": err.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
