use fiado::services::{schedule, InterestService};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use time::OffsetDateTime;

use entity::enums::{CreditType, InterestType, TransactionType};

use crate::common::*;

fn months_ago(months: i32) -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_date(schedule::add_months(now.date(), -months))
}

fn nominal_interest(principal: Decimal, rate_percent: Decimal, days: i64) -> Decimal {
    principal * rate_percent / dec!(100) * (Decimal::from(days) / dec!(365))
}

#[tokio::test]
async fn short_term_nominal_interest_accrues_on_the_balance() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(5000), dec!(1000)).await;

    let last = months_ago(2);
    backdate_accrual(&db, account.id, last).await;

    let service = InterestService::new(db.clone());
    let interest = service.apply_interest(account.id).await.unwrap();

    let days = (OffsetDateTime::now_utc().date() - last.date()).whole_days();
    let expected = nominal_interest(dec!(1000), dec!(12), days).round_dp(2);
    assert_eq!(interest, expected);

    let account = reload_account(&db, account.id).await;
    assert_eq!(account.current_balance, dec!(1000) + expected);
    // The accrual stamp moved, so the charge is visible on the ledger too.
    assert!(account.last_interest_accrual_at > last);
}

#[tokio::test]
async fn interest_is_idempotent_within_a_calendar_month() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(5000), dec!(1000)).await;
    backdate_accrual(&db, account.id, months_ago(1)).await;

    let service = InterestService::new(db.clone());
    let first = service.apply_interest(account.id).await.unwrap();
    assert!(first > Decimal::ZERO);
    let balance_after_first = reload_account(&db, account.id).await.current_balance;

    let second = service.apply_interest(account.id).await.unwrap();
    assert_eq!(second, Decimal::ZERO);
    let balance_after_second = reload_account(&db, account.id).await.current_balance;
    assert_eq!(balance_after_first, balance_after_second);
}

#[tokio::test]
async fn no_interest_before_a_month_has_rolled_over() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    // last_interest_accrual_at defaults to now.
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(5000), dec!(1000)).await;

    let service = InterestService::new(db.clone());
    let interest = service.apply_interest(account.id).await.unwrap();
    assert_eq!(interest, Decimal::ZERO);
}

#[tokio::test]
async fn no_interest_on_a_zero_balance() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(5000), dec!(0)).await;
    backdate_accrual(&db, account.id, months_ago(3)).await;

    let service = InterestService::new(db.clone());
    let interest = service.apply_interest(account.id).await.unwrap();
    assert_eq!(interest, Decimal::ZERO);
}

#[tokio::test]
async fn effective_interest_is_below_nominal_for_part_of_a_year() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(5000), dec!(1000)).await;
    set_interest_type(&db, account.id, InterestType::Effective).await;

    let last = months_ago(2);
    backdate_accrual(&db, account.id, last).await;

    let service = InterestService::new(db.clone());
    let interest = service.apply_interest(account.id).await.unwrap();

    let days = (OffsetDateTime::now_utc().date() - last.date()).whole_days();
    let nominal = nominal_interest(dec!(1000), dec!(12), days).round_dp(2);
    assert!(interest > Decimal::ZERO);
    assert!(interest < nominal);
}

#[tokio::test]
async fn long_term_interest_sums_over_pending_installments() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(5000), dec!(1000)).await;
    set_credit_type(&db, account.id, CreditType::LongTerm).await;
    backdate_accrual(&db, account.id, months_ago(2)).await;

    let today = OffsetDateTime::now_utc().date();
    seed_installment(&db, account.id, today + time::Duration::days(30), dec!(500)).await;
    seed_installment(&db, account.id, today + time::Duration::days(60), dec!(500)).await;

    let service = InterestService::new(db.clone());
    let interest = service.apply_interest(account.id).await.unwrap();

    let expected = (nominal_interest(dec!(500), dec!(12), 30)
        + nominal_interest(dec!(500), dec!(12), 60))
    .round_dp(2);
    assert_eq!(interest, expected);

    let account = reload_account(&db, account.id).await;
    assert_eq!(account.current_balance, dec!(1000) + expected);
}

#[tokio::test]
async fn interest_sweep_reports_applied_and_skipped_accounts() {
    let db = setup_test_db().await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let maria = seed_client(&db, "Maria").await;
    let joao = seed_client(&db, "Joao").await;
    let ana = seed_client(&db, "Ana").await;

    // One account due for accrual, one accrued recently, one with no debt.
    let due = seed_account(&db, Some(maria.id), establishment.id, dec!(5000), dec!(1000)).await;
    backdate_accrual(&db, due.id, months_ago(2)).await;
    seed_account(&db, Some(joao.id), establishment.id, dec!(5000), dec!(1000)).await;
    let settled = seed_account(&db, Some(ana.id), establishment.id, dec!(5000), dec!(0)).await;
    backdate_accrual(&db, settled.id, months_ago(2)).await;

    let service = InterestService::new(db.clone());
    let outcome = service
        .apply_interest_to_all(establishment.id)
        .await
        .unwrap();

    assert_eq!(outcome.applied, vec![due.id]);
    assert_eq!(outcome.skipped, 2);
    assert!(outcome.failures.is_empty());

    // The sweep leaves an accrual entry on the applied account only.
    let ledger = fiado::services::LedgerService::new(db.clone());
    let history = ledger.list_history(due.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].transaction_type, TransactionType::InterestAccrual);
}

#[tokio::test]
async fn interest_sweep_on_unknown_establishment_fails() {
    let db = setup_test_db().await;
    let service = InterestService::new(db.clone());

    let err = service
        .apply_interest_to_all(uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, fiado::error::ApiError::NotFound(_)));
}
