// Route modules
pub mod accounts;
pub mod credit_requests;
pub mod ledger;

use crate::{
    app_state::AppState,
    middleware::{jwt_auth_middleware, logging_middleware},
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_v1_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API v1 routes
fn api_v1_routes(state: AppState) -> Router<AppState> {
    // Every ledger operation is admin-facing and requires a valid token
    let protected_routes = Router::new()
        .route("/accounts", post(accounts::create_account))
        .route(
            "/accounts/{id}",
            get(accounts::get_account)
                .patch(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route("/accounts/{id}/purchases", post(ledger::record_purchase))
        .route("/accounts/{id}/payments", post(ledger::record_payment))
        .route("/accounts/{id}/transactions", get(ledger::list_transactions))
        .route("/accounts/{id}/history", get(ledger::list_history))
        .route("/accounts/{id}/assign-client", post(accounts::assign_client))
        .route(
            "/establishments/{id}/accounts",
            get(accounts::list_by_establishment),
        )
        .route("/clients/{id}/accounts", get(accounts::list_by_client))
        .route(
            "/establishments/{id}/apply-interest",
            post(ledger::apply_interest),
        )
        .route(
            "/establishments/{id}/apply-late-fees",
            post(ledger::apply_late_fees),
        )
        .route(
            "/establishments/{id}/debt-summary",
            get(ledger::debt_summary),
        )
        .route(
            "/establishments/{id}/credit-requests/pending",
            get(credit_requests::list_pending),
        )
        .route("/credit-requests", post(credit_requests::create_request))
        .route("/credit-requests/{id}", get(credit_requests::get_request))
        .route(
            "/credit-requests/{id}/approve",
            post(credit_requests::approve_request),
        )
        .route(
            "/credit-requests/{id}/reject",
            post(credit_requests::reject_request),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    // Combine all routes with request/response logging
    Router::new()
        .merge(protected_routes)
        .layer(middleware::from_fn(logging_middleware))
}
