use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Local;
use serde_json::json;

use super::domain::{LoanApplicationRequest, ScoringRequest};
use super::service::{CalculatorService, CreditCalculation};
use super::validation::ValidationErrors;

/// Router exposing pre-scoring and full calculation.
pub fn calculator_router(service: Arc<CalculatorService>) -> Router {
    Router::new()
        .route("/calculator/offers", post(offers_handler))
        .route("/calculator/calc", post(calc_handler))
        .with_state(service)
}

pub(crate) async fn offers_handler(
    State(service): State<Arc<CalculatorService>>,
    axum::Json(request): axum::Json<LoanApplicationRequest>,
) -> Response {
    let today = Local::now().date_naive();
    match service.offers(&request, today) {
        Ok(offers) => (StatusCode::OK, axum::Json(offers)).into_response(),
        Err(errors) => validation_response(errors),
    }
}

pub(crate) async fn calc_handler(
    State(service): State<Arc<CalculatorService>>,
    axum::Json(request): axum::Json<ScoringRequest>,
) -> Response {
    let today = Local::now().date_naive();
    match service.calculate(&request, today) {
        Ok(CreditCalculation::Approved(terms)) => {
            (StatusCode::OK, axum::Json(terms)).into_response()
        }
        Ok(CreditCalculation::Rejected(reason)) => {
            let payload = json!({
                "error": "application rejected",
                "rejection_reason": reason.summary(),
                "reason": reason,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(errors) => validation_response(errors),
    }
}

pub(crate) fn validation_response(errors: ValidationErrors) -> Response {
    let payload = json!({
        "error": errors.to_string(),
        "errors": errors.errors,
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}
