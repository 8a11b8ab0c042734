use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use crate::workflows::ids::StatementId;
use crate::workflows::underwriting::router::validation_response;
use crate::workflows::underwriting::{LoanApplicationRequest, Offer};

use super::domain::FinishRegistrationRequest;
use super::lifecycle::LifecycleError;
use super::repository::{RepositoryError, StatementRepository};
use super::scorer::RemoteScorer;
use super::service::{DealService, DealServiceError};

/// Router builder exposing the deal flow.
pub fn deal_router<R, S>(service: Arc<DealService<R, S>>) -> Router
where
    R: StatementRepository + 'static,
    S: RemoteScorer + 'static,
{
    Router::new()
        .route("/deal/statement", post(create_statement_handler::<R, S>))
        .route("/deal/offer/select", post(select_offer_handler::<R, S>))
        .route(
            "/deal/calculate/:statement_id",
            post(calculate_handler::<R, S>),
        )
        .route(
            "/deal/statement/:statement_id",
            get(statement_handler::<R, S>),
        )
        .with_state(service)
}

pub(crate) async fn create_statement_handler<R, S>(
    State(service): State<Arc<DealService<R, S>>>,
    axum::Json(request): axum::Json<LoanApplicationRequest>,
) -> Response
where
    R: StatementRepository + 'static,
    S: RemoteScorer + 'static,
{
    match service.create_statement(request).await {
        Ok(offers) => (StatusCode::OK, axum::Json(offers)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn select_offer_handler<R, S>(
    State(service): State<Arc<DealService<R, S>>>,
    axum::Json(offer): axum::Json<Offer>,
) -> Response
where
    R: StatementRepository + 'static,
    S: RemoteScorer + 'static,
{
    match service.select_offer(&offer) {
        Ok(statement) => (StatusCode::OK, axum::Json(statement.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn calculate_handler<R, S>(
    State(service): State<Arc<DealService<R, S>>>,
    Path(statement_id): Path<String>,
    axum::Json(finish): axum::Json<FinishRegistrationRequest>,
) -> Response
where
    R: StatementRepository + 'static,
    S: RemoteScorer + 'static,
{
    let statement_id = match parse_statement_id(&statement_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match service.calculate_credit(&statement_id, finish).await {
        Ok(statement) => (StatusCode::OK, axum::Json(statement.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn statement_handler<R, S>(
    State(service): State<Arc<DealService<R, S>>>,
    Path(statement_id): Path<String>,
) -> Response
where
    R: StatementRepository + 'static,
    S: RemoteScorer + 'static,
{
    let statement_id = match parse_statement_id(&statement_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match service.statement(&statement_id) {
        Ok(statement) => (StatusCode::OK, axum::Json(statement.view())).into_response(),
        Err(error) => error_response(error),
    }
}

fn parse_statement_id(raw: &str) -> Result<StatementId, Response> {
    raw.parse::<StatementId>().map_err(|_| {
        let payload = json!({
            "error": "invalid statement id",
            "statement_id": raw,
        });
        (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
    })
}

pub(crate) fn status_for(error: &DealServiceError) -> StatusCode {
    match error {
        DealServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        DealServiceError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
        DealServiceError::Lifecycle(error) => match error {
            LifecycleError::NotFound(_) | LifecycleError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            LifecycleError::InvalidState { .. } => StatusCode::BAD_REQUEST,
            LifecycleError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            LifecycleError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        },
    }
}

fn error_response(error: DealServiceError) -> Response {
    let status = status_for(&error);
    match error {
        DealServiceError::Validation(errors) => validation_response(errors),
        other => {
            let payload = json!({
                "error": other.to_string(),
            });
            (status, axum::Json(payload)).into_response()
        }
    }
}
