use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{entity::*, ConnectOptions, Database, DatabaseConnection};
use time::OffsetDateTime;
use uuid::Uuid;

use entity::enums::{CreditType, FeeType, InstallmentStatus, InterestType};

pub async fn setup_test_db() -> DatabaseConnection {
    let database_url =
        std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

    // A single pooled connection so every handle sees the same in-memory
    // database.
    let mut options = ConnectOptions::new(database_url);
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn seed_client(db: &DatabaseConnection, name: &str) -> entity::client::Model {
    let now = OffsetDateTime::now_utc();
    entity::client::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        credit_limit: Set(dec!(10000)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed client")
}

pub async fn deactivate_client(db: &DatabaseConnection, client_id: Uuid) {
    let client = entity::client::Entity::find_by_id(client_id)
        .one(db)
        .await
        .expect("Failed to load client")
        .expect("Client missing");
    let mut active: entity::client::ActiveModel = client.into();
    active.is_active = Set(false);
    active.update(db).await.expect("Failed to deactivate client");
}

pub async fn seed_establishment(db: &DatabaseConnection, name: &str) -> entity::establishment::Model {
    let now = OffsetDateTime::now_utc();
    entity::establishment::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        admin_id: Set(Uuid::new_v4()),
        late_fee_rule_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed establishment")
}

/// Seeds a short-term nominal account at 12% with a given limit and balance.
/// Tests needing other terms adjust the returned model via an ActiveModel.
pub async fn seed_account(
    db: &DatabaseConnection,
    client_id: Option<Uuid>,
    establishment_id: Uuid,
    credit_limit: Decimal,
    balance: Decimal,
) -> entity::credit_account::Model {
    let now = OffsetDateTime::now_utc();
    entity::credit_account::ActiveModel {
        id: Set(Uuid::new_v4()),
        establishment_id: Set(establishment_id),
        client_id: Set(client_id),
        credit_limit: Set(credit_limit),
        current_balance: Set(balance),
        monthly_due_day: Set(10),
        interest_rate: Set(dec!(12)),
        interest_type: Set(InterestType::Nominal),
        credit_type: Set(CreditType::ShortTerm),
        grace_period_months: Set(0),
        is_blocked: Set(false),
        last_interest_accrual_at: Set(now),
        late_fee_rule_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed credit account")
}

pub async fn block_account(db: &DatabaseConnection, account_id: Uuid) {
    update_account(db, account_id, |active| active.is_blocked = Set(true)).await;
}

pub async fn set_due_day(db: &DatabaseConnection, account_id: Uuid, due_day: i32) {
    update_account(db, account_id, |active| {
        active.monthly_due_day = Set(due_day)
    })
    .await;
}

pub async fn set_credit_type(db: &DatabaseConnection, account_id: Uuid, credit_type: CreditType) {
    update_account(db, account_id, |active| active.credit_type = Set(credit_type)).await;
}

pub async fn set_interest_type(
    db: &DatabaseConnection,
    account_id: Uuid,
    interest_type: InterestType,
) {
    update_account(db, account_id, |active| {
        active.interest_type = Set(interest_type)
    })
    .await;
}

pub async fn pin_late_fee_rule(db: &DatabaseConnection, account_id: Uuid, rule_id: Uuid) {
    update_account(db, account_id, |active| {
        active.late_fee_rule_id = Set(Some(rule_id))
    })
    .await;
}

pub async fn backdate_accrual(db: &DatabaseConnection, account_id: Uuid, when: OffsetDateTime) {
    update_account(db, account_id, |active| {
        active.last_interest_accrual_at = Set(when)
    })
    .await;
}

async fn update_account<F>(db: &DatabaseConnection, account_id: Uuid, mutate: F)
where
    F: FnOnce(&mut entity::credit_account::ActiveModel),
{
    let account = entity::credit_account::Entity::find_by_id(account_id)
        .one(db)
        .await
        .expect("Failed to load account")
        .expect("Account missing");
    let mut active: entity::credit_account::ActiveModel = account.into();
    mutate(&mut active);
    active.update(db).await.expect("Failed to update account");
}

pub async fn seed_rule(
    db: &DatabaseConnection,
    establishment_id: Option<Uuid>,
    days_overdue_min: i32,
    days_overdue_max: i32,
    fee_type: FeeType,
    fee_value: Decimal,
) -> entity::late_fee_rule::Model {
    entity::late_fee_rule::ActiveModel {
        id: Set(Uuid::new_v4()),
        establishment_id: Set(establishment_id),
        days_overdue_min: Set(days_overdue_min),
        days_overdue_max: Set(days_overdue_max),
        fee_type: Set(fee_type),
        fee_value: Set(fee_value),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await
    .expect("Failed to seed late fee rule")
}

pub async fn seed_installment(
    db: &DatabaseConnection,
    account_id: Uuid,
    due_date: time::Date,
    amount: Decimal,
) -> entity::installment::Model {
    entity::installment::ActiveModel {
        id: Set(Uuid::new_v4()),
        credit_account_id: Set(account_id),
        due_date: Set(due_date),
        amount: Set(amount),
        status: Set(InstallmentStatus::Pending),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await
    .expect("Failed to seed installment")
}

pub async fn reload_account(
    db: &DatabaseConnection,
    account_id: Uuid,
) -> entity::credit_account::Model {
    entity::credit_account::Entity::find_by_id(account_id)
        .one(db)
        .await
        .expect("Failed to load account")
        .expect("Account missing")
}
