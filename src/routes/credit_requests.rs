use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    error::{ApiError, Result},
    middleware::AdminIdentity,
    models::{
        accounts::AccountResponse,
        credit_requests::{CreateCreditRequestRequest, CreditRequestResponse},
    },
};

/// POST /api/v1/credit-requests
#[instrument(skip(state, request))]
pub async fn create_request(
    State(state): State<AppState>,
    Json(request): Json<CreateCreditRequestRequest>,
) -> Result<(StatusCode, Json<CreditRequestResponse>)> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Validation error: {}", e)))?;

    let created = state.credit_request_service.create_request(&request).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /api/v1/credit-requests/{id}
#[instrument(skip(state))]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CreditRequestResponse>> {
    let request = state.credit_request_service.get_request(id).await?;

    Ok(Json(request.into()))
}

/// POST /api/v1/credit-requests/{id}/approve
///
/// Only the establishment's admin may decide; the account created from the
/// approved terms is returned.
#[instrument(skip(state, identity))]
pub async fn approve_request(
    State(state): State<AppState>,
    identity: AdminIdentity,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<AccountResponse>)> {
    let account = state
        .credit_request_service
        .approve(id, identity.admin_id)
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// POST /api/v1/credit-requests/{id}/reject
#[instrument(skip(state, identity))]
pub async fn reject_request(
    State(state): State<AppState>,
    identity: AdminIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<CreditRequestResponse>> {
    let request = state
        .credit_request_service
        .reject(id, identity.admin_id)
        .await?;

    Ok(Json(request.into()))
}

/// GET /api/v1/establishments/{id}/credit-requests/pending
#[instrument(skip(state))]
pub async fn list_pending(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CreditRequestResponse>>> {
    let requests = state.credit_request_service.list_pending(id).await?;

    Ok(Json(requests.into_iter().map(Into::into).collect()))
}
