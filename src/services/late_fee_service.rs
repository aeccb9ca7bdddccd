use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{entity::*, query::*, DatabaseConnection, DatabaseTransaction, TransactionTrait};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use entity::enums::{FeeType, RecipientType, TransactionType};

use crate::{
    error::{ApiError, Result},
    models::reports::{BatchFailure, BatchOutcome},
    services::{
        posting::{load_account_for_update, post_entry, Posting, MONEY_SCALE},
        require_establishment, schedule,
    },
};

/// Resolves the applicable late-fee rule by days overdue and applies the fee.
pub struct LateFeeService {
    db: DatabaseConnection,
}

impl LateFeeService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies one late fee to the account for the current billing period.
    ///
    /// No-op (returns zero) when the account is not past its due day, or
    /// when the pinned rule's window does not cover the days overdue. Fails
    /// with `NoApplicableRule` when no pinned rule exists and neither the
    /// establishment's rules nor the global rules match.
    #[instrument(skip(self))]
    pub async fn apply_late_fee(&self, account_id: Uuid) -> Result<Decimal> {
        let txn = self.db.begin().await?;
        let account = load_account_for_update(&txn, account_id).await?;
        let now = OffsetDateTime::now_utc();

        let days_overdue = schedule::days_overdue(now.date(), account.monthly_due_day);
        if days_overdue <= 0 {
            txn.commit().await?;
            return Ok(Decimal::ZERO);
        }

        let rule = self.resolve_rule(&txn, &account, days_overdue).await?;
        let fee = late_fee_amount(&rule, account.current_balance, days_overdue)
            .round_dp(MONEY_SCALE);
        if fee <= Decimal::ZERO {
            txn.commit().await?;
            return Ok(Decimal::ZERO);
        }

        entity::late_fee::ActiveModel {
            id: Set(Uuid::new_v4()),
            credit_account_id: Set(account_id),
            amount: Set(fee),
            applied_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let establishment_id = account.establishment_id;
        let updated = post_entry(
            &txn,
            account,
            Posting {
                transaction_type: TransactionType::LateFeeApplied,
                recipient_type: RecipientType::Establishment,
                recipient_id: establishment_id,
                amount: fee,
                balance_delta: fee,
                description: "Late payment fee applied",
            },
        )
        .await?;

        txn.commit().await?;

        info!(
            "Applied late fee: account={}, days_overdue={}, fee={}, balance={}",
            account_id, days_overdue, fee, updated.current_balance
        );

        Ok(fee)
    }

    /// Applies late fees to every overdue account of the establishment
    /// (positive balance, past due day), one independent transaction per
    /// account, collecting per-account failures.
    #[instrument(skip(self))]
    pub async fn apply_late_fees_to_all(&self, establishment_id: Uuid) -> Result<BatchOutcome> {
        require_establishment(&self.db, establishment_id).await?;

        let today = OffsetDateTime::now_utc().date();
        let accounts = entity::credit_account::Entity::find()
            .filter(entity::credit_account::Column::EstablishmentId.eq(establishment_id))
            .filter(entity::credit_account::Column::CurrentBalance.gt(Decimal::ZERO))
            .all(&self.db)
            .await?;

        let mut outcome = BatchOutcome::default();
        for account in accounts {
            if schedule::days_overdue(today, account.monthly_due_day) <= 0 {
                outcome.skipped += 1;
                continue;
            }
            match self.apply_late_fee(account.id).await {
                Ok(fee) if fee > Decimal::ZERO => outcome.applied.push(account.id),
                Ok(_) => outcome.skipped += 1,
                Err(e) => {
                    warn!("Late fee failed: account={}, error={}", account.id, e);
                    outcome.failures.push(BatchFailure {
                        credit_account_id: account.id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Late fee sweep: establishment={}, applied={}, skipped={}, failed={}",
            establishment_id,
            outcome.applied.len(),
            outcome.skipped,
            outcome.failures.len()
        );

        Ok(outcome)
    }

    /// Rule resolution order: the account's pinned rule when present, else
    /// the first matching establishment rule, else the first matching global
    /// rule. Rules are ordered by ascending window start then creation time,
    /// so first-match is deterministic.
    async fn resolve_rule(
        &self,
        txn: &DatabaseTransaction,
        account: &entity::credit_account::Model,
        days_overdue: i32,
    ) -> Result<entity::late_fee_rule::Model> {
        if let Some(rule_id) = account.late_fee_rule_id {
            return entity::late_fee_rule::Entity::find_by_id(rule_id)
                .one(txn)
                .await?
                .ok_or_else(|| {
                    ApiError::NoApplicableRule(format!(
                        "pinned late fee rule {} does not exist",
                        rule_id
                    ))
                });
        }

        let establishment_rules = entity::late_fee_rule::Entity::find()
            .filter(entity::late_fee_rule::Column::EstablishmentId.eq(account.establishment_id))
            .order_by_asc(entity::late_fee_rule::Column::DaysOverdueMin)
            .order_by_asc(entity::late_fee_rule::Column::CreatedAt)
            .all(txn)
            .await?;

        if let Some(rule) = first_matching_rule(&establishment_rules, days_overdue) {
            return Ok(rule.clone());
        }

        let global_rules = entity::late_fee_rule::Entity::find()
            .filter(entity::late_fee_rule::Column::EstablishmentId.is_null())
            .order_by_asc(entity::late_fee_rule::Column::DaysOverdueMin)
            .order_by_asc(entity::late_fee_rule::Column::CreatedAt)
            .all(txn)
            .await?;

        first_matching_rule(&global_rules, days_overdue)
            .cloned()
            .ok_or_else(|| {
                ApiError::NoApplicableRule(format!(
                    "no late fee rule covers {} days overdue for account {}",
                    days_overdue, account.id
                ))
            })
    }
}

/// First rule whose inclusive window contains `days_overdue`.
fn first_matching_rule(
    rules: &[entity::late_fee_rule::Model],
    days_overdue: i32,
) -> Option<&entity::late_fee_rule::Model> {
    rules.iter().find(|r| r.matches(days_overdue))
}

/// Fee for a resolved rule: percentage of the outstanding balance or a flat
/// amount. Zero when the rule's window does not cover `days_overdue`
/// (possible for pinned rules, which skip window-based resolution).
fn late_fee_amount(
    rule: &entity::late_fee_rule::Model,
    balance: Decimal,
    days_overdue: i32,
) -> Decimal {
    if !rule.matches(days_overdue) {
        return Decimal::ZERO;
    }
    match rule.fee_type {
        FeeType::Percentage => rule.fee_value / dec!(100) * balance,
        FeeType::FixedAmount => rule.fee_value,
    }
}
