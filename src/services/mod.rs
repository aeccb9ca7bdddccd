// Service modules
pub mod accounts_service;
pub mod credit_request_service;
pub mod interest_service;
pub mod jwt_service;
pub mod late_fee_service;
pub mod ledger_service;
pub mod posting;
pub mod schedule;

pub use accounts_service::AccountsService;
pub use credit_request_service::CreditRequestService;
pub use interest_service::InterestService;
pub use late_fee_service::LateFeeService;
pub use ledger_service::LedgerService;

use sea_orm::{ConnectionTrait, EntityTrait};
use uuid::Uuid;

use crate::error::{ApiError, Result};

/// Client lookup consumed by the ledger core.
pub(crate) async fn require_client<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
) -> Result<entity::client::Model> {
    entity::client::Entity::find_by_id(client_id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("client {} not found", client_id)))
}

/// Establishment lookup consumed by the ledger core.
pub(crate) async fn require_establishment<C: ConnectionTrait>(
    db: &C,
    establishment_id: Uuid,
) -> Result<entity::establishment::Model> {
    entity::establishment::Entity::find_by_id(establishment_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("establishment {} not found", establishment_id))
        })
}

/// Maps a storage-level uniqueness violation to a client-friendly conflict.
pub(crate) fn map_unique_violation<T>(
    result: std::result::Result<T, sea_orm::DbErr>,
    conflict_message: impl FnOnce() -> String,
) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) => {
            let msg = e.to_string().to_lowercase();
            if msg.contains("unique") || msg.contains("duplicate") {
                Err(ApiError::Conflict(conflict_message()))
            } else {
                Err(e.into())
            }
        }
    }
}
