//! The atomic posting primitive.
//!
//! Every account mutation funnels through [`post_entry`]: one transaction
//! row, one history row carrying the resulting balance, and the balance
//! update itself, all inside the caller's database transaction. A failure at
//! any step rolls the whole unit back with the caller.

use rust_decimal::Decimal;
use sea_orm::{entity::*, query::*, DatabaseTransaction};
use time::OffsetDateTime;
use uuid::Uuid;

use entity::enums::{RecipientType, TransactionType};

use crate::error::{ApiError, Result};

/// Loads an account under an exclusive row lock, serializing concurrent
/// mutations of the same account for the lifetime of `txn`.
pub async fn load_account_for_update(
    txn: &DatabaseTransaction,
    account_id: Uuid,
) -> Result<entity::credit_account::Model> {
    entity::credit_account::Entity::find_by_id(account_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("credit account {} not found", account_id)))
}

/// Number of decimal places amounts carry once posted.
pub const MONEY_SCALE: u32 = 2;

/// One ledger entry to be applied to a locked account.
pub struct Posting<'a> {
    pub transaction_type: TransactionType,
    pub recipient_type: RecipientType,
    pub recipient_id: Uuid,
    /// Amount recorded on the transaction row (magnitude).
    pub amount: Decimal,
    /// Signed amount applied to the balance. Zero for audit-only events
    /// (block/unblock, limit changes).
    pub balance_delta: Decimal,
    pub description: &'a str,
}

/// Appends a transaction and a history row and persists the new balance.
///
/// The caller must hold an exclusive lock on the account row for the
/// duration of `txn`; this function performs no locking itself.
pub async fn post_entry(
    txn: &DatabaseTransaction,
    account: entity::credit_account::Model,
    posting: Posting<'_>,
) -> Result<entity::credit_account::Model> {
    let now = OffsetDateTime::now_utc();
    let amount = posting.amount.round_dp(MONEY_SCALE);
    let balance_delta = posting.balance_delta.round_dp(MONEY_SCALE);
    let new_balance = account.current_balance + balance_delta;
    let account_id = account.id;

    entity::transaction::ActiveModel {
        id: Set(Uuid::new_v4()),
        credit_account_id: Set(Some(account_id)),
        transaction_type: Set(posting.transaction_type),
        recipient_type: Set(posting.recipient_type),
        recipient_id: Set(posting.recipient_id),
        amount: Set(amount),
        description: Set(posting.description.to_string()),
        occurred_at: Set(now),
    }
    .insert(txn)
    .await?;

    let mut active: entity::credit_account::ActiveModel = account.into();
    active.current_balance = Set(new_balance);
    active.updated_at = Set(now);
    let updated = active.update(txn).await?;

    // History carries the signed view; audit-only events record the raw
    // amount against the unchanged balance.
    let history_amount = if balance_delta.is_zero() {
        amount
    } else {
        balance_delta
    };

    entity::credit_account_history::ActiveModel {
        id: Set(Uuid::new_v4()),
        credit_account_id: Set(account_id),
        transaction_type: Set(posting.transaction_type),
        amount: Set(history_amount),
        balance: Set(new_balance),
        description: Set(posting.description.to_string()),
        occurred_at: Set(now),
    }
    .insert(txn)
    .await?;

    Ok(updated)
}
