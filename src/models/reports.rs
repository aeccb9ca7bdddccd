use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use entity::enums::CreditType;

/// Aggregate result of a batch sweep (interest accrual or late fees).
/// One account's failure never aborts the sweep; it is reported here.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// Accounts a charge was posted to.
    pub applied: Vec<Uuid>,
    /// Accounts visited without posting (nothing due).
    pub skipped: usize,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub credit_account_id: Uuid,
    pub error: String,
}

/// One row of the establishment debt report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtSummaryEntry {
    pub credit_account_id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub credit_type: CreditType,
    pub interest_rate: Decimal,
    /// Installment count; zero for short-term accounts.
    pub number_of_dues: u64,
    pub current_balance: Decimal,
    pub due_date: time::Date,
}
