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
    models::accounts::{
        AccountResponse, AssignClientRequest, CreateAccountRequest, UpdateAccountRequest,
    },
};

/// POST /api/v1/accounts
#[instrument(skip(state, request))]
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>)> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Validation error: {}", e)))?;

    let account = state.accounts_service.create_account(&request).await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// GET /api/v1/accounts/{id}
#[instrument(skip(state))]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountResponse>> {
    let account = state.accounts_service.get_account(id).await?;

    Ok(Json(account.into()))
}

/// PATCH /api/v1/accounts/{id}
#[instrument(skip(state, request))]
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Validation error: {}", e)))?;

    let account = state.accounts_service.update_account(id, &request).await?;

    Ok(Json(account.into()))
}

/// DELETE /api/v1/accounts/{id}
#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.accounts_service.delete_account(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/establishments/{id}/accounts
#[instrument(skip(state))]
pub async fn list_by_establishment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AccountResponse>>> {
    let accounts = state.accounts_service.list_by_establishment(id).await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/clients/{id}/accounts
#[instrument(skip(state))]
pub async fn list_by_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AccountResponse>>> {
    let accounts = state.accounts_service.list_by_client(id).await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/accounts/{id}/assign-client
#[instrument(skip(state, request))]
pub async fn assign_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignClientRequest>,
) -> Result<Json<AccountResponse>> {
    let account = state
        .accounts_service
        .assign_account_to_client(id, request.client_id)
        .await?;

    Ok(Json(account.into()))
}
