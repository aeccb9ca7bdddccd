use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An establishment extending store credit to its clients. The owning
/// admin backs the credit-request permission checks.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "establishments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Admin allowed to approve/reject credit requests for this establishment.
    pub admin_id: Uuid,
    /// Default rule pinned onto accounts created through request approval.
    pub late_fee_rule_id: Option<Uuid>,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::credit_account::Entity")]
    CreditAccounts,
    #[sea_orm(has_many = "super::late_fee_rule::Entity")]
    LateFeeRules,
}

impl Related<super::credit_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditAccounts.def()
    }
}

impl Related<super::late_fee_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LateFeeRules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
