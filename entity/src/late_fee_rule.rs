use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::FeeType;

/// Late-fee policy matched by days overdue. A null establishment makes the
/// rule global. Resolution order is ascending `days_overdue_min`, then
/// `created_at`, so first-match lookup is deterministic.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "late_fee_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub establishment_id: Option<Uuid>,
    pub days_overdue_min: i32,
    /// Exclusive upper bound not required: the window is inclusive on both
    /// ends, with `days_overdue_max > days_overdue_min` enforced by a check
    /// constraint.
    pub days_overdue_max: i32,
    pub fee_type: FeeType,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub fee_value: Decimal,
    pub created_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::establishment::Entity",
        from = "Column::EstablishmentId",
        to = "super::establishment::Column::Id"
    )]
    Establishment,
}

impl Related<super::establishment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Establishment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether this rule's inclusive window contains `days_overdue`.
    pub fn matches(&self, days_overdue: i32) -> bool {
        days_overdue >= self.days_overdue_min && days_overdue <= self.days_overdue_max
    }
}
