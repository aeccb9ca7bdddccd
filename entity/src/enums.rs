//! String-backed enums shared by the ledger tables.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

/// Repayment style of a credit account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum CreditType {
    /// Single monthly balance cycle.
    #[sea_orm(string_value = "short_term")]
    ShortTerm,
    /// Discrete installments with their own due dates.
    #[sea_orm(string_value = "long_term")]
    LongTerm,
}

/// Interest-compounding formula applied to outstanding balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum InterestType {
    #[sea_orm(string_value = "nominal")]
    Nominal,
    #[sea_orm(string_value = "effective")]
    Effective,
}

/// Kind of balance-affecting (or audit-only) ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[sea_orm(string_value = "purchase")]
    Purchase,
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "early_payment")]
    EarlyPayment,
    #[sea_orm(string_value = "interest_accrual")]
    InterestAccrual,
    #[sea_orm(string_value = "late_fee_applied")]
    LateFeeApplied,
    #[sea_orm(string_value = "credit_limit_increase")]
    CreditLimitIncrease,
    #[sea_orm(string_value = "credit_limit_decrease")]
    CreditLimitDecrease,
    #[sea_orm(string_value = "account_blocked")]
    AccountBlocked,
    #[sea_orm(string_value = "account_unblocked")]
    AccountUnblocked,
}

/// Party on the receiving end of a ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum RecipientType {
    #[sea_orm(string_value = "client")]
    Client,
    #[sea_orm(string_value = "establishment")]
    Establishment,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// How a late-fee rule computes its fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    /// `fee_value` is a percentage of the outstanding balance.
    #[sea_orm(string_value = "percentage")]
    Percentage,
    /// `fee_value` is a flat amount.
    #[sea_orm(string_value = "fixed_amount")]
    FixedAmount,
}

/// Lifecycle of a credit request. Approved and Rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Lifecycle of a long-term installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "overdue")]
    Overdue,
}
