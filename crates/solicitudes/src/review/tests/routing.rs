use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::review::router::{approval_support_handler, review_router, validation_handler};
use crate::review::scoring::{ScoringConfig, HUMAN_DECISION_NOTICE};
use crate::review::service::ReviewService;
use crate::review::snapshot::SnapshotSource;

#[tokio::test]
async fn search_route_returns_matching_applications() {
    let payload = json!({ "estatus": ["aprobada"], "monto_minimo": 50000 });

    let response = router()
        .oneshot(
            Request::post("/api/v1/solicitudes/search")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["solicitudes"][0]["solicitud_id"], 1);
}

#[tokio::test]
async fn partition_route_lists_errors() {
    let response = router()
        .oneshot(
            Request::get("/api/v1/solicitudes/partition")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["valid"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["errors"][0], "Solicitud #4 sin cliente_id");
}

#[tokio::test]
async fn validation_handler_serializes_result() {
    let response = validation_handler::<SnapshotSource>(State(build_service()), Path(4)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["score"], 20);
    assert_eq!(body["nivel_riesgo"], "critico");
    assert_eq!(body["requiere_revision_manual"], true);
    assert_eq!(body["checks"][0]["check"], "datos_completos");
}

#[tokio::test]
async fn approval_support_handler_includes_notice() {
    let response =
        approval_support_handler::<SnapshotSource>(State(build_service()), Path(2)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["recomendacion"], "aprobar");
    assert_eq!(body["aviso"], HUMAN_DECISION_NOTICE);
}

#[tokio::test]
async fn document_quality_route_uses_backend_check_names() {
    let response = router()
        .oneshot(
            Request::get("/api/v1/documentos/10/quality")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["score"], 100);
    assert_eq!(body["checks"][1]["check"], "tamaño_adecuado");
}

#[tokio::test]
async fn completeness_route_returns_not_found_for_unknown_client() {
    let response = router()
        .oneshot(
            Request::get("/api/v1/clientes/404/completeness")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "cliente #404 not found");
}

#[tokio::test]
async fn dashboard_route_reports_unavailable_source() {
    let service = Arc::new(ReviewService::new(
        Arc::new(OfflineSource),
        ScoringConfig::default(),
    ));

    let response = review_router(service)
        .oneshot(
            Request::get("/api/v1/dashboard")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn dashboard_route_returns_summary() {
    let response = router()
        .oneshot(
            Request::get("/api/v1/dashboard")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total_solicitudes"], 4);
    assert_eq!(body["tasa_aprobacion"], 100);
}
