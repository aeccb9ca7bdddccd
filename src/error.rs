use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Credit limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("Payment exceeds balance: {0}")]
    InsufficientBalance(String),

    #[error("Account is blocked: {0}")]
    AccountBlocked(String),

    #[error("No applicable late fee rule: {0}")]
    NoApplicableRule(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            ApiError::NotFound(ref msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            ApiError::InvalidState(ref msg) => (StatusCode::CONFLICT, "INVALID_STATE", msg.clone()),
            ApiError::LimitExceeded(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CREDIT_LIMIT_EXCEEDED",
                msg.clone(),
            ),
            ApiError::InsufficientBalance(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PAYMENT_EXCEEDS_BALANCE",
                msg.clone(),
            ),
            ApiError::AccountBlocked(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "ACCOUNT_BLOCKED",
                msg.clone(),
            ),
            ApiError::NoApplicableRule(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_APPLICABLE_RULE",
                msg.clone(),
            ),
            ApiError::Conflict(ref msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            ApiError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            ApiError::Internal(ref e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

// Helper type for results
pub type Result<T> = std::result::Result<T, ApiError>;
