use rust_decimal::Decimal;
use sea_orm::{entity::*, query::*, DatabaseConnection, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use entity::enums::{RecipientType, TransactionType};

use crate::{
    error::{ApiError, Result},
    services::posting::{load_account_for_update, post_entry, Posting},
};

/// Transaction processor: purchase and payment application with limit and
/// balance checks, plus read projections over the ledger rows.
pub struct LedgerService {
    db: DatabaseConnection,
}

impl LedgerService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies a purchase to the account: balance goes up by `amount`.
    ///
    /// Fails with `AccountBlocked` on blocked accounts and `LimitExceeded`
    /// when the resulting balance would pass the credit limit. All writes
    /// are committed-or-nothing.
    #[instrument(skip(self, description))]
    pub async fn process_purchase(
        &self,
        account_id: Uuid,
        amount: Decimal,
        description: &str,
    ) -> Result<entity::credit_account::Model> {
        require_positive(amount)?;

        let txn = self.db.begin().await?;
        let account = load_account_for_update(&txn, account_id).await?;

        if account.is_blocked {
            return Err(ApiError::AccountBlocked(format!(
                "credit account {} is blocked, cannot process purchase",
                account_id
            )));
        }
        if account.current_balance + amount > account.credit_limit {
            return Err(ApiError::LimitExceeded(format!(
                "purchase of {} would raise balance {} over limit {}",
                amount, account.current_balance, account.credit_limit
            )));
        }
        let client_id = account.client_id.ok_or_else(|| {
            ApiError::InvalidState(format!(
                "credit account {} is not assigned to a client",
                account_id
            ))
        })?;

        let updated = post_entry(
            &txn,
            account,
            Posting {
                transaction_type: TransactionType::Purchase,
                recipient_type: RecipientType::Client,
                recipient_id: client_id,
                amount,
                balance_delta: amount,
                description,
            },
        )
        .await?;

        txn.commit().await?;

        info!(
            "Processed purchase: account={}, amount={}, balance={}",
            account_id, amount, updated.current_balance
        );

        Ok(updated)
    }

    /// Applies a payment to the account: balance goes down by `amount`.
    ///
    /// Fails with `InsufficientBalance` when the payment would overshoot the
    /// outstanding balance. A blocked account whose balance reaches zero is
    /// unblocked in the same unit of work.
    #[instrument(skip(self, description))]
    pub async fn process_payment(
        &self,
        account_id: Uuid,
        amount: Decimal,
        description: &str,
    ) -> Result<entity::credit_account::Model> {
        require_positive(amount)?;

        let txn = self.db.begin().await?;
        let account = load_account_for_update(&txn, account_id).await?;

        if amount > account.current_balance {
            return Err(ApiError::InsufficientBalance(format!(
                "payment of {} exceeds current balance {}",
                amount, account.current_balance
            )));
        }

        let establishment_id = account.establishment_id;
        let mut updated = post_entry(
            &txn,
            account,
            Posting {
                transaction_type: TransactionType::Payment,
                recipient_type: RecipientType::Establishment,
                recipient_id: establishment_id,
                amount,
                balance_delta: -amount,
                description,
            },
        )
        .await?;

        if updated.is_blocked && updated.current_balance <= Decimal::ZERO {
            updated = post_entry(
                &txn,
                updated,
                Posting {
                    transaction_type: TransactionType::AccountUnblocked,
                    recipient_type: RecipientType::Establishment,
                    recipient_id: establishment_id,
                    amount: Decimal::ZERO,
                    balance_delta: Decimal::ZERO,
                    description: "Account unblocked after balance settled",
                },
            )
            .await?;

            let mut active: entity::credit_account::ActiveModel = updated.into();
            active.is_blocked = Set(false);
            updated = active.update(&txn).await?;
        }

        txn.commit().await?;

        info!(
            "Processed payment: account={}, amount={}, balance={}",
            account_id, amount, updated.current_balance
        );

        Ok(updated)
    }

    /// All transaction rows for an account, oldest first.
    #[instrument(skip(self))]
    pub async fn list_transactions(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<entity::transaction::Model>> {
        self.require_account(account_id).await?;

        let transactions = entity::transaction::Entity::find()
            .filter(entity::transaction::Column::CreditAccountId.eq(account_id))
            .order_by_asc(entity::transaction::Column::OccurredAt)
            .all(&self.db)
            .await?;

        Ok(transactions)
    }

    /// The audit trail of an account, oldest first.
    #[instrument(skip(self))]
    pub async fn list_history(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<entity::credit_account_history::Model>> {
        self.require_account(account_id).await?;

        let history = entity::credit_account_history::Entity::find()
            .filter(entity::credit_account_history::Column::CreditAccountId.eq(account_id))
            .order_by_asc(entity::credit_account_history::Column::OccurredAt)
            .all(&self.db)
            .await?;

        Ok(history)
    }

    async fn require_account(&self, account_id: Uuid) -> Result<entity::credit_account::Model> {
        entity::credit_account::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("credit account {} not found", account_id)))
    }
}

fn require_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(ApiError::BadRequest(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}
