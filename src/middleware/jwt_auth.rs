use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    error::{ApiError, Result},
    services::jwt_service::JwtService,
};

/// Verified admin identity, passed explicitly into workflow calls instead of
/// being read from ambient claim maps.
#[derive(Debug, Clone, Copy)]
pub struct AdminIdentity {
    pub admin_id: Uuid,
}

/// Bearer-token authentication middleware.
///
/// Validates the JWT access token from the Authorization header and stores
/// the verified admin identity in request extensions. Returns 401 when the
/// header is missing or validation fails.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized("Invalid Authorization format, expected 'Bearer <token>'".to_string())
    })?;

    let claims = state.jwt_service.validate_token(token)?;
    let admin_id = JwtService::admin_id_from_claims(&claims)?;

    request.extensions_mut().insert(AdminIdentity { admin_id });

    Ok(next.run(request).await)
}

/// Axum extractor for the verified admin identity. Only available on routes
/// behind `jwt_auth_middleware`.
impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminIdentity>()
            .copied()
            .ok_or_else(|| {
                ApiError::Unauthorized(
                    "Admin identity not found - route must be protected by jwt_auth_middleware"
                        .to_string(),
                )
            })
    }
}
