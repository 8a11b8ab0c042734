use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use loan_pipeline::workflows::statement::{
    deal_router, DealService, RemoteScorer, StatementRepository,
};
use loan_pipeline::workflows::underwriting::{calculator_router, CalculatorService};
use serde_json::json;
use std::sync::Arc;

/// Calculator and deal routes plus the operational endpoints.
pub(crate) fn with_pipeline_routes<R, S>(
    calculator: Arc<CalculatorService>,
    deal: Arc<DealService<R, S>>,
) -> axum::Router
where
    R: StatementRepository + 'static,
    S: RemoteScorer + 'static,
{
    calculator_router(calculator)
        .merge(deal_router(deal))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
