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
    models::{
        accounts::AccountResponse,
        ledger::AmountRequest,
        reports::{BatchOutcome, DebtSummaryEntry},
    },
};

/// POST /api/v1/accounts/{id}/purchases
#[instrument(skip(state, request))]
pub async fn record_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AmountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>)> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Validation error: {}", e)))?;

    let account = state
        .ledger_service
        .process_purchase(id, request.amount, &request.description)
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// POST /api/v1/accounts/{id}/payments
#[instrument(skip(state, request))]
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AmountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>)> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Validation error: {}", e)))?;

    let account = state
        .ledger_service
        .process_payment(id, request.amount, &request.description)
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// GET /api/v1/accounts/{id}/transactions
#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<entity::transaction::Model>>> {
    let transactions = state.ledger_service.list_transactions(id).await?;

    Ok(Json(transactions))
}

/// GET /api/v1/accounts/{id}/history
#[instrument(skip(state))]
pub async fn list_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<entity::credit_account_history::Model>>> {
    let history = state.ledger_service.list_history(id).await?;

    Ok(Json(history))
}

/// POST /api/v1/establishments/{id}/apply-interest
#[instrument(skip(state))]
pub async fn apply_interest(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BatchOutcome>> {
    let outcome = state.interest_service.apply_interest_to_all(id).await?;

    Ok(Json(outcome))
}

/// POST /api/v1/establishments/{id}/apply-late-fees
#[instrument(skip(state))]
pub async fn apply_late_fees(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BatchOutcome>> {
    let outcome = state.late_fee_service.apply_late_fees_to_all(id).await?;

    Ok(Json(outcome))
}

/// GET /api/v1/establishments/{id}/debt-summary
#[instrument(skip(state))]
pub async fn debt_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DebtSummaryEntry>>> {
    let summary = state.accounts_service.debt_summary(id).await?;

    Ok(Json(summary))
}
