use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A client that can hold credit accounts. External collaborator of the
/// ledger core; only the fields the core consumes are modelled.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Client-wide credit ceiling, independent of any single account limit.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub credit_limit: Decimal,
    pub is_active: bool,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::credit_account::Entity")]
    CreditAccounts,
}

impl Related<super::credit_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
