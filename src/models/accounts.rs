use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use entity::enums::{CreditType, InterestType};

/// Request to open a credit account directly (without a credit request).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub client_id: Uuid,
    pub establishment_id: Uuid,
    pub credit_limit: Decimal,
    #[validate(range(min = 1, max = 31))]
    pub monthly_due_day: i32,
    /// Annual rate in percent.
    pub interest_rate: Decimal,
    pub interest_type: InterestType,
    pub credit_type: CreditType,
    #[validate(range(min = 0, max = 24))]
    #[serde(default)]
    pub grace_period_months: i32,
    pub late_fee_rule_id: Option<Uuid>,
}

/// Partial update of an account's terms. Absent fields are left untouched.
/// Changing the limit or the blocked flag leaves an audit event on the
/// ledger; the balance itself is never updatable through this path.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub credit_limit: Option<Decimal>,
    #[validate(range(min = 1, max = 31))]
    pub monthly_due_day: Option<i32>,
    pub interest_rate: Option<Decimal>,
    pub interest_type: Option<InterestType>,
    pub credit_type: Option<CreditType>,
    #[validate(range(min = 0, max = 24))]
    pub grace_period_months: Option<i32>,
    pub is_blocked: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignClientRequest {
    pub client_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub client_id: Option<Uuid>,
    pub credit_limit: Decimal,
    pub current_balance: Decimal,
    pub monthly_due_day: i32,
    pub interest_rate: Decimal,
    pub interest_type: InterestType,
    pub credit_type: CreditType,
    pub grace_period_months: i32,
    pub is_blocked: bool,
    pub last_interest_accrual_at: time::OffsetDateTime,
    pub late_fee_rule_id: Option<Uuid>,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

impl From<entity::credit_account::Model> for AccountResponse {
    fn from(m: entity::credit_account::Model) -> Self {
        Self {
            id: m.id,
            establishment_id: m.establishment_id,
            client_id: m.client_id,
            credit_limit: m.credit_limit,
            current_balance: m.current_balance,
            monthly_due_day: m.monthly_due_day,
            interest_rate: m.interest_rate,
            interest_type: m.interest_type,
            credit_type: m.credit_type,
            grace_period_months: m.grace_period_months,
            is_blocked: m.is_blocked,
            last_interest_accrual_at: m.last_interest_accrual_at,
            late_fee_rule_id: m.late_fee_rule_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
