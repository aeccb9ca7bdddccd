use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use sea_orm::{entity::*, query::*, DatabaseConnection, TransactionTrait};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use entity::enums::{CreditType, InstallmentStatus, InterestType, RecipientType, TransactionType};

use crate::{
    error::Result,
    models::reports::{BatchFailure, BatchOutcome},
    services::{
        posting::{load_account_for_update, post_entry, Posting, MONEY_SCALE},
        require_establishment, schedule,
    },
};

/// Computes and applies monthly interest per account.
pub struct InterestService {
    db: DatabaseConnection,
}

impl InterestService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Accrues one period of interest onto the account balance.
    ///
    /// No-op (returns zero) when the balance is zero or a calendar month has
    /// not rolled over since the last accrual, which makes repeated calls
    /// within the same window idempotent. Short-term accounts accrue on the
    /// outstanding balance over elapsed days; long-term accounts accrue per
    /// pending installment over its days until due.
    #[instrument(skip(self))]
    pub async fn apply_interest(&self, account_id: Uuid) -> Result<Decimal> {
        let txn = self.db.begin().await?;
        let account = load_account_for_update(&txn, account_id).await?;
        let now = OffsetDateTime::now_utc();

        if account.current_balance.is_zero()
            || !schedule::month_elapsed(account.last_interest_accrual_at, now)
        {
            txn.commit().await?;
            return Ok(Decimal::ZERO);
        }

        let interest = match account.credit_type {
            CreditType::ShortTerm => {
                let elapsed = schedule::elapsed_days(account.last_interest_accrual_at, now);
                interest_on(
                    account.current_balance,
                    account.interest_rate,
                    elapsed,
                    account.interest_type,
                )
            }
            CreditType::LongTerm => {
                let installments = entity::installment::Entity::find()
                    .filter(entity::installment::Column::CreditAccountId.eq(account_id))
                    .filter(entity::installment::Column::Status.eq(InstallmentStatus::Pending))
                    .all(&txn)
                    .await?;

                installments
                    .iter()
                    .map(|i| {
                        let days_until_due = (i.due_date - now.date()).whole_days();
                        interest_on(
                            i.amount,
                            account.interest_rate,
                            days_until_due,
                            account.interest_type,
                        )
                    })
                    .sum()
            }
        };
        let interest = interest.round_dp(MONEY_SCALE);

        if interest <= Decimal::ZERO {
            txn.commit().await?;
            return Ok(Decimal::ZERO);
        }

        let (recipient_type, recipient_id) = match account.client_id {
            Some(client_id) => (RecipientType::Client, client_id),
            None => (RecipientType::Establishment, account.establishment_id),
        };

        let updated = post_entry(
            &txn,
            account,
            Posting {
                transaction_type: TransactionType::InterestAccrual,
                recipient_type,
                recipient_id,
                amount: interest,
                balance_delta: interest,
                description: "Monthly interest accrued",
            },
        )
        .await?;

        let mut active: entity::credit_account::ActiveModel = updated.into();
        active.last_interest_accrual_at = Set(now);
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            "Accrued interest: account={}, interest={}, balance={}",
            account_id, interest, updated.current_balance
        );

        Ok(interest)
    }

    /// Accrues interest on every account of the establishment, one
    /// independent transaction per account. A failure on one account lands
    /// in the outcome's failure list and the sweep continues.
    #[instrument(skip(self))]
    pub async fn apply_interest_to_all(&self, establishment_id: Uuid) -> Result<BatchOutcome> {
        require_establishment(&self.db, establishment_id).await?;

        let accounts = entity::credit_account::Entity::find()
            .filter(entity::credit_account::Column::EstablishmentId.eq(establishment_id))
            .all(&self.db)
            .await?;

        let mut outcome = BatchOutcome::default();
        for account in accounts {
            match self.apply_interest(account.id).await {
                Ok(interest) if interest > Decimal::ZERO => outcome.applied.push(account.id),
                Ok(_) => outcome.skipped += 1,
                Err(e) => {
                    warn!("Interest accrual failed: account={}, error={}", account.id, e);
                    outcome.failures.push(BatchFailure {
                        credit_account_id: account.id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Interest sweep: establishment={}, applied={}, skipped={}, failed={}",
            establishment_id,
            outcome.applied.len(),
            outcome.skipped,
            outcome.failures.len()
        );

        Ok(outcome)
    }
}

/// Interest on `principal` over `days`, by the account's compounding type.
///
/// Nominal: `principal * rate/100 * days/365`.
/// Effective: `principal * ((1 + rate/100)^(days/365) - 1)`.
pub(crate) fn interest_on(
    principal: Decimal,
    rate_percent: Decimal,
    days: i64,
    interest_type: InterestType,
) -> Decimal {
    if days <= 0 || principal <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let years = Decimal::from(days) / dec!(365);
    match interest_type {
        InterestType::Nominal => principal * (rate_percent / dec!(100)) * years,
        InterestType::Effective => {
            principal * ((Decimal::ONE + rate_percent / dec!(100)).powd(years) - Decimal::ONE)
        }
    }
}
