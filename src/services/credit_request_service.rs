use rust_decimal::Decimal;
use sea_orm::{entity::*, query::*, DatabaseConnection, PaginatorTrait, TransactionTrait};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use entity::enums::RequestStatus;

use crate::{
    error::{ApiError, Result},
    models::credit_requests::CreateCreditRequestRequest,
    services::{map_unique_violation, require_client, require_establishment},
};

/// Credit-request workflow: Pending, then Approved or Rejected, both
/// terminal. Approval creates exactly one credit account from the requested
/// terms in the same unit of work.
pub struct CreditRequestService {
    db: DatabaseConnection,
}

impl CreditRequestService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, req))]
    pub async fn create_request(
        &self,
        req: &CreateCreditRequestRequest,
    ) -> Result<entity::credit_request::Model> {
        let client = require_client(&self.db, req.client_id).await?;
        if !client.is_active {
            return Err(ApiError::BadRequest(format!(
                "client {} is not active",
                client.id
            )));
        }
        require_establishment(&self.db, req.establishment_id).await?;

        let existing = entity::credit_account::Entity::find()
            .filter(entity::credit_account::Column::ClientId.eq(req.client_id))
            .filter(entity::credit_account::Column::EstablishmentId.eq(req.establishment_id))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(ApiError::Conflict(format!(
                "a credit account already exists for client {} at establishment {}",
                req.client_id, req.establishment_id
            )));
        }

        let now = OffsetDateTime::now_utc();
        let request = entity::credit_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_id: Set(req.client_id),
            establishment_id: Set(req.establishment_id),
            requested_credit_limit: Set(req.requested_credit_limit),
            monthly_due_day: Set(req.monthly_due_day),
            interest_rate: Set(req.interest_rate),
            interest_type: Set(req.interest_type),
            credit_type: Set(req.credit_type),
            grace_period_months: Set(req.grace_period_months),
            status: Set(RequestStatus::Pending),
            approved_at: Set(None),
            rejected_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(
            "Created credit request: id={}, client={}, establishment={}",
            request.id, req.client_id, req.establishment_id
        );

        Ok(request)
    }

    #[instrument(skip(self))]
    pub async fn get_request(&self, request_id: Uuid) -> Result<entity::credit_request::Model> {
        entity::credit_request::Entity::find_by_id(request_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("credit request {} not found", request_id)))
    }

    /// Approves a pending request and creates the account it asked for.
    ///
    /// Only the establishment's admin may approve. A non-pending request
    /// fails with `InvalidState`, so a second approval attempt can never
    /// create a second account.
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        request_id: Uuid,
        acting_admin_id: Uuid,
    ) -> Result<entity::credit_account::Model> {
        let txn = self.db.begin().await?;
        let request = self.load_for_decision(&txn, request_id, acting_admin_id).await?;
        let establishment = require_establishment(&txn, request.establishment_id).await?;

        let now = OffsetDateTime::now_utc();
        let insert_result = entity::credit_account::ActiveModel {
            id: Set(Uuid::new_v4()),
            establishment_id: Set(request.establishment_id),
            client_id: Set(Some(request.client_id)),
            credit_limit: Set(request.requested_credit_limit),
            current_balance: Set(Decimal::ZERO),
            monthly_due_day: Set(request.monthly_due_day),
            interest_rate: Set(request.interest_rate),
            interest_type: Set(request.interest_type),
            credit_type: Set(request.credit_type),
            grace_period_months: Set(request.grace_period_months),
            is_blocked: Set(false),
            last_interest_accrual_at: Set(now),
            late_fee_rule_id: Set(establishment.late_fee_rule_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await;

        let account = map_unique_violation(insert_result, || {
            format!(
                "a credit account already exists for client {} at establishment {}",
                request.client_id, request.establishment_id
            )
        })?;

        let mut active: entity::credit_request::ActiveModel = request.into();
        active.status = Set(RequestStatus::Approved);
        active.approved_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        info!(
            "Approved credit request: request={}, account={}, admin={}",
            request_id, account.id, acting_admin_id
        );

        Ok(account)
    }

    /// Rejects a pending request. Same guards as approval; no account is
    /// created.
    #[instrument(skip(self))]
    pub async fn reject(
        &self,
        request_id: Uuid,
        acting_admin_id: Uuid,
    ) -> Result<entity::credit_request::Model> {
        let txn = self.db.begin().await?;
        let request = self.load_for_decision(&txn, request_id, acting_admin_id).await?;

        let now = OffsetDateTime::now_utc();
        let mut active: entity::credit_request::ActiveModel = request.into();
        active.status = Set(RequestStatus::Rejected);
        active.rejected_at = Set(Some(now));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            "Rejected credit request: request={}, admin={}",
            request_id, acting_admin_id
        );

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn list_pending(
        &self,
        establishment_id: Uuid,
    ) -> Result<Vec<entity::credit_request::Model>> {
        require_establishment(&self.db, establishment_id).await?;

        let requests = entity::credit_request::Entity::find()
            .filter(entity::credit_request::Column::EstablishmentId.eq(establishment_id))
            .filter(entity::credit_request::Column::Status.eq(RequestStatus::Pending))
            .order_by_asc(entity::credit_request::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(requests)
    }

    /// Loads a request under lock and applies the shared decision guards:
    /// the acting admin must own the establishment and the request must
    /// still be pending.
    async fn load_for_decision(
        &self,
        txn: &sea_orm::DatabaseTransaction,
        request_id: Uuid,
        acting_admin_id: Uuid,
    ) -> Result<entity::credit_request::Model> {
        let request = entity::credit_request::Entity::find_by_id(request_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("credit request {} not found", request_id))
            })?;

        let establishment = require_establishment(txn, request.establishment_id).await?;
        if establishment.admin_id != acting_admin_id {
            return Err(ApiError::Forbidden(format!(
                "admin {} does not manage establishment {}",
                acting_admin_id, establishment.id
            )));
        }
        if request.status != RequestStatus::Pending {
            return Err(ApiError::InvalidState(format!(
                "credit request {} is already {:?}",
                request_id, request.status
            )));
        }

        Ok(request)
    }
}
