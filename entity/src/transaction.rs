use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{RecipientType, TransactionType};

/// Append-only record of a single ledger event. Never updated after insert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Absent for events not tied to a specific account.
    pub credit_account_id: Option<Uuid>,
    pub transaction_type: TransactionType,
    pub recipient_type: RecipientType,
    pub recipient_id: Uuid,
    /// Magnitude of the event; the sign lives on the history row, so
    /// payments are recorded positive here.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub description: String,
    pub occurred_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::credit_account::Entity",
        from = "Column::CreditAccountId",
        to = "super::credit_account::Column::Id"
    )]
    CreditAccount,
}

impl Related<super::credit_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
