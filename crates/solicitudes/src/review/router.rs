use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::filter::FilterSpec;
use super::service::{ReviewService, ReviewServiceError};
use super::source::{RecordSource, SourceError};

/// Router exposing the review pipeline over HTTP.
pub fn review_router<S>(service: Arc<ReviewService<S>>) -> Router
where
    S: RecordSource + 'static,
{
    Router::new()
        .route("/api/v1/solicitudes/search", post(search_handler::<S>))
        .route("/api/v1/solicitudes/partition", get(partition_handler::<S>))
        .route(
            "/api/v1/solicitudes/:solicitud_id/validation",
            get(validation_handler::<S>),
        )
        .route(
            "/api/v1/solicitudes/:solicitud_id/approval-support",
            get(approval_support_handler::<S>),
        )
        .route(
            "/api/v1/documentos/:documento_id/quality",
            get(document_quality_handler::<S>),
        )
        .route(
            "/api/v1/clientes/:cliente_id/completeness",
            get(completeness_handler::<S>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<S>))
        .with_state(service)
}

fn respond<T: Serialize>(result: Result<T, ReviewServiceError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: ReviewServiceError) -> Response {
    match error {
        ReviewServiceError::NotFound { .. } | ReviewServiceError::Source(SourceError::NotFound) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        ReviewServiceError::Source(SourceError::Unavailable(_)) => {
            let payload = json!({
                "error": "record source unavailable, please retry",
                "retryable": true,
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchResponse<T> {
    total: usize,
    solicitudes: Vec<T>,
}

pub(crate) async fn search_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
    Json(spec): Json<FilterSpec>,
) -> Response
where
    S: RecordSource + 'static,
{
    respond(service.search(&spec).map(|solicitudes| SearchResponse {
        total: solicitudes.len(),
        solicitudes,
    }))
}

pub(crate) async fn partition_handler<S>(State(service): State<Arc<ReviewService<S>>>) -> Response
where
    S: RecordSource + 'static,
{
    respond(service.partition())
}

pub(crate) async fn validation_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
    Path(solicitud_id): Path<i64>,
) -> Response
where
    S: RecordSource + 'static,
{
    respond(service.application_validation(solicitud_id))
}

pub(crate) async fn approval_support_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
    Path(solicitud_id): Path<i64>,
) -> Response
where
    S: RecordSource + 'static,
{
    respond(service.approval_support(solicitud_id))
}

pub(crate) async fn document_quality_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
    Path(documento_id): Path<i64>,
) -> Response
where
    S: RecordSource + 'static,
{
    respond(service.document_quality(documento_id))
}

pub(crate) async fn completeness_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
    Path(cliente_id): Path<i64>,
) -> Response
where
    S: RecordSource + 'static,
{
    respond(service.client_completeness(cliente_id))
}

pub(crate) async fn dashboard_handler<S>(State(service): State<Arc<ReviewService<S>>>) -> Response
where
    S: RecordSource + 'static,
{
    respond(service.dashboard())
}
