use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{CreditType, InterestType};

/// One credit line per (client, establishment) pair, enforced by a unique
/// index. The balance is signed: positive means the client owes.
///
/// The balance is mutated exclusively through the posting primitive, which
/// appends a transaction and a history row in the same unit of work.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub establishment_id: Uuid,
    /// Vacant until the account is assigned to a client.
    pub client_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub credit_limit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub current_balance: Decimal,
    /// Day of month (1-31) payments fall due, clamped to month length.
    pub monthly_due_day: i32,
    /// Annual rate in percent.
    #[sea_orm(column_type = "Decimal(Some((9, 4)))")]
    pub interest_rate: Decimal,
    pub interest_type: InterestType,
    pub credit_type: CreditType,
    pub grace_period_months: i32,
    pub is_blocked: bool,
    pub last_interest_accrual_at: TimeDateTimeWithTimeZone,
    /// Pinned rule; falls back to the establishment's rule set when absent.
    pub late_fee_rule_id: Option<Uuid>,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::establishment::Entity",
        from = "Column::EstablishmentId",
        to = "super::establishment::Column::Id"
    )]
    Establishment,
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    #[sea_orm(has_many = "super::credit_account_history::Entity")]
    History,
    #[sea_orm(has_many = "super::late_fee::Entity")]
    LateFees,
    #[sea_orm(has_many = "super::installment::Entity")]
    Installments,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::establishment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Establishment.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::credit_account_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl Related<super::late_fee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LateFees.def()
    }
}

impl Related<super::installment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Installments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
