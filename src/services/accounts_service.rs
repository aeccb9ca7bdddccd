use rust_decimal::Decimal;
use sea_orm::{entity::*, query::*, DatabaseConnection, PaginatorTrait, TransactionTrait};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use entity::enums::{CreditType, InstallmentStatus, RecipientType, TransactionType};

use crate::{
    error::{ApiError, Result},
    models::{
        accounts::{CreateAccountRequest, UpdateAccountRequest},
        reports::DebtSummaryEntry,
    },
    services::{
        map_unique_violation,
        posting::{load_account_for_update, post_entry, Posting},
        require_client, require_establishment, schedule,
    },
};

/// Credit account lifecycle: creation, term updates, listing and reports.
/// Balance mutation lives in the other services; this one only ever posts
/// audit events.
pub struct AccountsService {
    db: DatabaseConnection,
}

impl AccountsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens an account for a (client, establishment) pair. At most one
    /// account may exist per pair; the check is backed by a unique index so
    /// two concurrent creations cannot both succeed.
    #[instrument(skip(self, req))]
    pub async fn create_account(
        &self,
        req: &CreateAccountRequest,
    ) -> Result<entity::credit_account::Model> {
        let client = require_client(&self.db, req.client_id).await?;
        if !client.is_active {
            return Err(ApiError::BadRequest(format!(
                "client {} is not active",
                client.id
            )));
        }
        require_establishment(&self.db, req.establishment_id).await?;

        if self
            .pair_exists(req.client_id, req.establishment_id)
            .await?
        {
            return Err(ApiError::Conflict(format!(
                "a credit account already exists for client {} at establishment {}",
                req.client_id, req.establishment_id
            )));
        }

        let now = OffsetDateTime::now_utc();
        let insert_result = entity::credit_account::ActiveModel {
            id: Set(Uuid::new_v4()),
            establishment_id: Set(req.establishment_id),
            client_id: Set(Some(req.client_id)),
            credit_limit: Set(req.credit_limit),
            current_balance: Set(Decimal::ZERO),
            monthly_due_day: Set(req.monthly_due_day),
            interest_rate: Set(req.interest_rate),
            interest_type: Set(req.interest_type),
            credit_type: Set(req.credit_type),
            grace_period_months: Set(req.grace_period_months),
            is_blocked: Set(false),
            last_interest_accrual_at: Set(now),
            late_fee_rule_id: Set(req.late_fee_rule_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        let account = map_unique_violation(insert_result, || {
            format!(
                "a credit account already exists for client {} at establishment {}",
                req.client_id, req.establishment_id
            )
        })?;

        info!(
            "Created credit account: id={}, client={}, establishment={}, limit={}",
            account.id, req.client_id, req.establishment_id, req.credit_limit
        );

        Ok(account)
    }

    #[instrument(skip(self))]
    pub async fn get_account(&self, account_id: Uuid) -> Result<entity::credit_account::Model> {
        entity::credit_account::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("credit account {} not found", account_id)))
    }

    /// Updates the account's terms. Limit changes and blocked-flag flips
    /// leave audit events on the ledger; the balance is untouched.
    #[instrument(skip(self, req))]
    pub async fn update_account(
        &self,
        account_id: Uuid,
        req: &UpdateAccountRequest,
    ) -> Result<entity::credit_account::Model> {
        let txn = self.db.begin().await?;
        let mut account = load_account_for_update(&txn, account_id).await?;
        let establishment_id = account.establishment_id;

        if let Some(limit) = req.credit_limit {
            if limit != account.credit_limit {
                let (transaction_type, description) = if limit > account.credit_limit {
                    (TransactionType::CreditLimitIncrease, "Credit limit raised")
                } else {
                    (TransactionType::CreditLimitDecrease, "Credit limit lowered")
                };
                let delta = (limit - account.credit_limit).abs();
                account = post_entry(
                    &txn,
                    account,
                    Posting {
                        transaction_type,
                        recipient_type: RecipientType::Establishment,
                        recipient_id: establishment_id,
                        amount: delta,
                        balance_delta: Decimal::ZERO,
                        description,
                    },
                )
                .await?;
            }
        }

        if let Some(blocked) = req.is_blocked {
            if blocked != account.is_blocked {
                let (transaction_type, description) = if blocked {
                    (TransactionType::AccountBlocked, "Account blocked")
                } else {
                    (TransactionType::AccountUnblocked, "Account unblocked")
                };
                account = post_entry(
                    &txn,
                    account,
                    Posting {
                        transaction_type,
                        recipient_type: RecipientType::Establishment,
                        recipient_id: establishment_id,
                        amount: Decimal::ZERO,
                        balance_delta: Decimal::ZERO,
                        description,
                    },
                )
                .await?;
            }
        }

        let mut active: entity::credit_account::ActiveModel = account.into();
        if let Some(limit) = req.credit_limit {
            active.credit_limit = Set(limit);
        }
        if let Some(due_day) = req.monthly_due_day {
            active.monthly_due_day = Set(due_day);
        }
        if let Some(rate) = req.interest_rate {
            active.interest_rate = Set(rate);
        }
        if let Some(interest_type) = req.interest_type {
            active.interest_type = Set(interest_type);
        }
        if let Some(credit_type) = req.credit_type {
            active.credit_type = Set(credit_type);
        }
        if let Some(grace) = req.grace_period_months {
            active.grace_period_months = Set(grace);
        }
        if let Some(blocked) = req.is_blocked {
            active.is_blocked = Set(blocked);
        }
        active.updated_at = Set(OffsetDateTime::now_utc());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        Ok(updated)
    }

    /// Deletes an account and its owned ledger rows. Refused while any
    /// balance is outstanding.
    #[instrument(skip(self))]
    pub async fn delete_account(&self, account_id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;
        let account = load_account_for_update(&txn, account_id).await?;

        if !account.current_balance.is_zero() {
            return Err(ApiError::InvalidState(format!(
                "credit account {} still carries a balance of {}",
                account_id, account.current_balance
            )));
        }

        entity::transaction::Entity::delete_many()
            .filter(entity::transaction::Column::CreditAccountId.eq(account_id))
            .exec(&txn)
            .await?;
        entity::credit_account_history::Entity::delete_many()
            .filter(entity::credit_account_history::Column::CreditAccountId.eq(account_id))
            .exec(&txn)
            .await?;
        entity::late_fee::Entity::delete_many()
            .filter(entity::late_fee::Column::CreditAccountId.eq(account_id))
            .exec(&txn)
            .await?;
        entity::installment::Entity::delete_many()
            .filter(entity::installment::Column::CreditAccountId.eq(account_id))
            .exec(&txn)
            .await?;
        entity::credit_account::Entity::delete_by_id(account_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!("Deleted credit account: id={}", account_id);

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_by_establishment(
        &self,
        establishment_id: Uuid,
    ) -> Result<Vec<entity::credit_account::Model>> {
        require_establishment(&self.db, establishment_id).await?;

        let accounts = entity::credit_account::Entity::find()
            .filter(entity::credit_account::Column::EstablishmentId.eq(establishment_id))
            .order_by_asc(entity::credit_account::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(accounts)
    }

    #[instrument(skip(self))]
    pub async fn list_by_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<entity::credit_account::Model>> {
        require_client(&self.db, client_id).await?;

        let accounts = entity::credit_account::Entity::find()
            .filter(entity::credit_account::Column::ClientId.eq(client_id))
            .order_by_asc(entity::credit_account::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(accounts)
    }

    /// Attaches a client to an account created without one. Fails with
    /// `InvalidState` when the slot is already taken.
    #[instrument(skip(self))]
    pub async fn assign_account_to_client(
        &self,
        account_id: Uuid,
        client_id: Uuid,
    ) -> Result<entity::credit_account::Model> {
        let txn = self.db.begin().await?;
        let account = load_account_for_update(&txn, account_id).await?;

        if let Some(existing) = account.client_id {
            return Err(ApiError::InvalidState(format!(
                "credit account {} is already assigned to client {}",
                account_id, existing
            )));
        }
        require_client(&txn, client_id).await?;

        let mut active: entity::credit_account::ActiveModel = account.into();
        active.client_id = Set(Some(client_id));
        active.updated_at = Set(OffsetDateTime::now_utc());
        let update_result = active.update(&txn).await;

        let updated = map_unique_violation(update_result, || {
            format!(
                "client {} already holds a credit account at this establishment",
                client_id
            )
        })?;

        txn.commit().await?;

        info!(
            "Assigned credit account {} to client {}",
            account_id, client_id
        );

        Ok(updated)
    }

    /// Per-account debt report for an establishment: who owes what, on which
    /// terms, and when the next payment falls due. Accounts without an
    /// assigned client are omitted.
    #[instrument(skip(self))]
    pub async fn debt_summary(&self, establishment_id: Uuid) -> Result<Vec<DebtSummaryEntry>> {
        require_establishment(&self.db, establishment_id).await?;

        let accounts = entity::credit_account::Entity::find()
            .filter(entity::credit_account::Column::EstablishmentId.eq(establishment_id))
            .order_by_asc(entity::credit_account::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let today = OffsetDateTime::now_utc().date();
        let mut summary = Vec::with_capacity(accounts.len());
        for account in accounts {
            let Some(client_id) = account.client_id else {
                continue;
            };
            let client = require_client(&self.db, client_id).await?;

            let (number_of_dues, due_date) = match account.credit_type {
                CreditType::ShortTerm => (0, schedule::next_due_date(today, account.monthly_due_day)),
                CreditType::LongTerm => {
                    let count = entity::installment::Entity::find()
                        .filter(entity::installment::Column::CreditAccountId.eq(account.id))
                        .count(&self.db)
                        .await?;
                    let next_pending = entity::installment::Entity::find()
                        .filter(entity::installment::Column::CreditAccountId.eq(account.id))
                        .filter(entity::installment::Column::Status.eq(InstallmentStatus::Pending))
                        .filter(entity::installment::Column::DueDate.gt(today))
                        .order_by_asc(entity::installment::Column::DueDate)
                        .one(&self.db)
                        .await?;
                    let due = next_pending
                        .map(|i| i.due_date)
                        .unwrap_or_else(|| schedule::next_due_date(today, account.monthly_due_day));
                    (count, due)
                }
            };

            summary.push(DebtSummaryEntry {
                credit_account_id: account.id,
                client_id,
                client_name: client.name,
                credit_type: account.credit_type,
                interest_rate: account.interest_rate,
                number_of_dues,
                current_balance: account.current_balance,
                due_date,
            });
        }

        Ok(summary)
    }

    async fn pair_exists(&self, client_id: Uuid, establishment_id: Uuid) -> Result<bool> {
        let count = entity::credit_account::Entity::find()
            .filter(entity::credit_account::Column::ClientId.eq(client_id))
            .filter(entity::credit_account::Column::EstablishmentId.eq(establishment_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}
