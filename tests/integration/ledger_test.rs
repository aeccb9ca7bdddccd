use fiado::{error::ApiError, services::LedgerService};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use entity::enums::TransactionType;

use crate::common::*;

#[tokio::test]
async fn purchase_within_limit_raises_balance_and_posts_ledger_rows() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(1000), dec!(200)).await;

    let service = LedgerService::new(db.clone());
    let updated = service
        .process_purchase(account.id, dec!(800), "Groceries")
        .await
        .unwrap();

    assert_eq!(updated.current_balance, dec!(1000));

    let transactions = service.list_transactions(account.id).await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].transaction_type, TransactionType::Purchase);
    assert_eq!(transactions[0].amount, dec!(800));
    assert_eq!(transactions[0].recipient_id, client.id);

    let history = service.list_history(account.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, dec!(800));
    assert_eq!(history[0].balance, dec!(1000));
}

#[tokio::test]
async fn purchase_over_limit_is_rejected_without_side_effects() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(1000), dec!(200)).await;

    let service = LedgerService::new(db.clone());
    let err = service
        .process_purchase(account.id, dec!(900), "Too much")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::LimitExceeded(_)));

    let account = reload_account(&db, account.id).await;
    assert_eq!(account.current_balance, dec!(200));
    assert!(service.list_transactions(account.id).await.unwrap().is_empty());
    assert!(service.list_history(account.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn purchase_up_to_exact_limit_is_allowed() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(1000), dec!(0)).await;

    let service = LedgerService::new(db.clone());
    let updated = service
        .process_purchase(account.id, dec!(1000), "Exactly the limit")
        .await
        .unwrap();
    assert_eq!(updated.current_balance, dec!(1000));
}

#[tokio::test]
async fn purchase_on_blocked_account_is_rejected() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(1000), dec!(0)).await;
    block_account(&db, account.id).await;

    let service = LedgerService::new(db.clone());
    let err = service
        .process_purchase(account.id, dec!(10), "Blocked")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::AccountBlocked(_)));
}

#[tokio::test]
async fn purchase_on_unassigned_account_is_rejected() {
    let db = setup_test_db().await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, None, establishment.id, dec!(1000), dec!(0)).await;

    let service = LedgerService::new(db.clone());
    let err = service
        .process_purchase(account.id, dec!(10), "No client")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidState(_)));
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(1000), dec!(100)).await;

    let service = LedgerService::new(db.clone());
    let err = service
        .process_purchase(account.id, Decimal::ZERO, "Zero")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    let err = service
        .process_payment(account.id, dec!(-5), "Negative")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn payment_reduces_balance_with_negative_history_amount() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(1000), dec!(500)).await;

    let service = LedgerService::new(db.clone());
    let updated = service
        .process_payment(account.id, dec!(500), "Paid in full")
        .await
        .unwrap();

    assert_eq!(updated.current_balance, Decimal::ZERO);

    let transactions = service.list_transactions(account.id).await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].transaction_type, TransactionType::Payment);
    assert_eq!(transactions[0].amount, dec!(500));
    assert_eq!(transactions[0].recipient_id, establishment.id);

    let history = service.list_history(account.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, dec!(-500));
    assert_eq!(history[0].balance, Decimal::ZERO);
}

#[tokio::test]
async fn payment_exceeding_balance_is_rejected() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(1000), dec!(500)).await;

    let service = LedgerService::new(db.clone());
    let err = service
        .process_payment(account.id, dec!(600), "Overpayment")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InsufficientBalance(_)));

    let account = reload_account(&db, account.id).await;
    assert_eq!(account.current_balance, dec!(500));
}

#[tokio::test]
async fn settling_payment_unblocks_a_blocked_account() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(1000), dec!(500)).await;
    block_account(&db, account.id).await;

    let service = LedgerService::new(db.clone());
    let updated = service
        .process_payment(account.id, dec!(500), "Settled")
        .await
        .unwrap();

    assert_eq!(updated.current_balance, Decimal::ZERO);
    assert!(!updated.is_blocked);

    // The unblock leaves its own audit event next to the payment.
    let history = service.list_history(account.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].transaction_type, TransactionType::AccountUnblocked);
    assert_eq!(history[1].balance, Decimal::ZERO);
}

#[tokio::test]
async fn partial_payment_leaves_blocked_account_blocked() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(1000), dec!(500)).await;
    block_account(&db, account.id).await;

    let service = LedgerService::new(db.clone());
    let updated = service
        .process_payment(account.id, dec!(200), "Partial")
        .await
        .unwrap();

    assert_eq!(updated.current_balance, dec!(300));
    assert!(updated.is_blocked);
}

#[tokio::test]
async fn listing_an_unknown_account_fails() {
    let db = setup_test_db().await;
    let service = LedgerService::new(db.clone());

    let err = service.list_transactions(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = service.list_history(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn aborted_unit_leaves_no_orphan_ledger_rows() {
    use entity::enums::RecipientType;
    use fiado::services::posting::{load_account_for_update, post_entry, Posting};
    use sea_orm::TransactionTrait;

    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(1000), dec!(200)).await;

    // Post a full entry inside a unit of work, then abort instead of
    // committing.
    let txn = db.begin().await.unwrap();
    let locked = load_account_for_update(&txn, account.id).await.unwrap();
    post_entry(
        &txn,
        locked,
        Posting {
            transaction_type: TransactionType::Purchase,
            recipient_type: RecipientType::Client,
            recipient_id: client.id,
            amount: dec!(100),
            balance_delta: dec!(100),
            description: "Never committed",
        },
    )
    .await
    .unwrap();
    txn.rollback().await.unwrap();

    // Nothing survives the abort: no transaction without its history row,
    // and the balance is untouched.
    let service = LedgerService::new(db.clone());
    assert!(service.list_transactions(account.id).await.unwrap().is_empty());
    assert!(service.list_history(account.id).await.unwrap().is_empty());

    let account = reload_account(&db, account.id).await;
    assert_eq!(account.current_balance, dec!(200));
}

#[tokio::test]
async fn concurrent_purchases_cannot_both_pass_the_limit() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(1000), dec!(0)).await;

    let service = LedgerService::new(db.clone());
    let (first, second) = tokio::join!(
        service.process_purchase(account.id, dec!(600), "First"),
        service.process_purchase(account.id, dec!(600), "Second"),
    );

    // The row lock serializes the two writes; only one fits under the limit.
    assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
    let err = first.and(second).unwrap_err();
    assert!(matches!(err, ApiError::LimitExceeded(_)));

    let account = reload_account(&db, account.id).await;
    assert_eq!(account.current_balance, dec!(600));
}

#[tokio::test]
async fn amounts_are_rounded_to_cents_when_posted() {
    let db = setup_test_db().await;
    let client = seed_client(&db, "Maria").await;
    let establishment = seed_establishment(&db, "Corner Store").await;
    let account = seed_account(&db, Some(client.id), establishment.id, dec!(1000), dec!(0)).await;

    let service = LedgerService::new(db.clone());
    let updated = service
        .process_purchase(account.id, dec!(10.005), "Sub-cent amount")
        .await
        .unwrap();

    // Banker's rounding at two decimal places.
    assert_eq!(updated.current_balance, dec!(10.00));
}
