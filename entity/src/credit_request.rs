use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{CreditType, InterestType, RequestStatus};

/// A client's application for a credit line. Approval atomically creates
/// exactly one credit account from the requested terms.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub establishment_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub requested_credit_limit: Decimal,
    pub monthly_due_day: i32,
    #[sea_orm(column_type = "Decimal(Some((9, 4)))")]
    pub interest_rate: Decimal,
    pub interest_type: InterestType,
    pub credit_type: CreditType,
    pub grace_period_months: i32,
    pub status: RequestStatus,
    pub approved_at: Option<TimeDateTimeWithTimeZone>,
    pub rejected_at: Option<TimeDateTimeWithTimeZone>,
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

impl ActiveModelBehavior for ActiveModel {}
