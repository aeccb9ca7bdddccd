use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use entity::enums::{CreditType, InterestType, RequestStatus};

/// A client's application for a credit line at an establishment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCreditRequestRequest {
    pub client_id: Uuid,
    pub establishment_id: Uuid,
    pub requested_credit_limit: Decimal,
    #[validate(range(min = 1, max = 31))]
    pub monthly_due_day: i32,
    pub interest_rate: Decimal,
    pub interest_type: InterestType,
    pub credit_type: CreditType,
    #[validate(range(min = 0, max = 24))]
    #[serde(default)]
    pub grace_period_months: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRequestResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub establishment_id: Uuid,
    pub requested_credit_limit: Decimal,
    pub monthly_due_day: i32,
    pub interest_rate: Decimal,
    pub interest_type: InterestType,
    pub credit_type: CreditType,
    pub grace_period_months: i32,
    pub status: RequestStatus,
    pub approved_at: Option<time::OffsetDateTime>,
    pub rejected_at: Option<time::OffsetDateTime>,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

impl From<entity::credit_request::Model> for CreditRequestResponse {
    fn from(m: entity::credit_request::Model) -> Self {
        Self {
            id: m.id,
            client_id: m.client_id,
            establishment_id: m.establishment_id,
            requested_credit_limit: m.requested_credit_limit,
            monthly_due_day: m.monthly_due_day,
            interest_rate: m.interest_rate,
            interest_type: m.interest_type,
            credit_type: m.credit_type,
            grace_period_months: m.grace_period_months,
            status: m.status,
            approved_at: m.approved_at,
            rejected_at: m.rejected_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
