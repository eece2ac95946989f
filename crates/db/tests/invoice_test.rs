//! Integration tests for invoice creation, lookup, updates and deletion.

mod common;

use invoicer_core::invoice::{Field, PaymentMethod};
use invoicer_db::InvoiceRepoError;
use invoicer_db::entities::invoices;
use invoicer_shared::types::InvoiceId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

use common::{payment_rows, setup};

#[tokio::test]
async fn test_create_converts_dollars_below_threshold() {
    let (_db, repo) = setup().await;

    let invoice = repo.create(Some(dec!(100))).await.unwrap();

    assert_eq!(invoice.total(), 10_000);
    assert_eq!(invoice.amount_owed(), dec!(100.00));
    assert!(!invoice.fully_paid());
    assert_eq!(repo.get(invoice.id()).await.unwrap().total(), 10_000);
}

#[tokio::test]
async fn test_create_keeps_cents_at_or_above_threshold() {
    let (_db, repo) = setup().await;

    let invoice = repo.create(Some(dec!(10000))).await.unwrap();
    assert_eq!(invoice.total(), 10_000);

    let invoice = repo.create(Some(dec!(50000))).await.unwrap();
    assert_eq!(invoice.total(), 50_000);
    assert_eq!(invoice.amount_owed(), dec!(500.00));
}

#[tokio::test]
async fn test_create_with_fractional_dollars() {
    let (_db, repo) = setup().await;

    let invoice = repo.create(Some(dec!(200.00))).await.unwrap();
    assert_eq!(invoice.total(), 20_000);
    assert_eq!(repo.amount_owed(invoice.id()).await.unwrap(), dec!(200.00));
}

#[tokio::test]
async fn test_create_rejects_invalid_totals() {
    let (db, repo) = setup().await;

    for total in [None, Some(dec!(0)), Some(dec!(-10))] {
        let err = repo.create(total).await.unwrap_err();
        match err {
            InvoiceRepoError::Validation(errors) => {
                assert_eq!(errors.on(Field::Total).len(), 1);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    let stored = invoices::Entity::find().all(&db).await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_find_and_get_missing_invoice() {
    let (_db, repo) = setup().await;

    assert!(repo.find(InvoiceId::new(999)).await.unwrap().is_none());
    assert!(matches!(
        repo.get(InvoiceId::new(999)).await,
        Err(InvoiceRepoError::NotFound(id)) if id == InvoiceId::new(999)
    ));
    assert!(matches!(
        repo.amount_owed(InvoiceId::new(999)).await,
        Err(InvoiceRepoError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_in_creation_order() {
    let (_db, repo) = setup().await;

    let first = repo.create(Some(dec!(10))).await.unwrap();
    let second = repo.create(Some(dec!(20))).await.unwrap();

    let ids: Vec<InvoiceId> = repo.list().await.unwrap().iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec![first.id(), second.id()]);
}

#[tokio::test]
async fn test_reload_picks_up_changes_from_other_handles() {
    let (_db, repo) = setup().await;
    let mut invoice = repo.create(Some(dec!(200.00))).await.unwrap();
    let mut other = repo.get(invoice.id()).await.unwrap();

    assert!(repo.update_total(&mut other, dec!(250.00)).await.unwrap());
    repo.create_payment(invoice.id(), 5_000, "cash").await.unwrap();
    assert_eq!(invoice.amount_owed(), dec!(200.00));

    repo.reload(&mut invoice).await.unwrap();
    assert_eq!(invoice.total(), 25_000);
    assert_eq!(invoice.payment_count(), 1);
    assert_eq!(invoice.amount_owed(), dec!(200.00));

    repo.delete(invoice.id()).await.unwrap();
    assert!(matches!(
        repo.reload(&mut invoice).await,
        Err(InvoiceRepoError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_update_total_renormalizes() {
    let (_db, repo) = setup().await;
    let mut invoice = repo.create(Some(dec!(100))).await.unwrap();

    assert!(repo.update_total(&mut invoice, dec!(250)).await.unwrap());
    assert_eq!(invoice.total(), 25_000);
    assert_eq!(repo.get(invoice.id()).await.unwrap().total(), 25_000);

    assert!(repo.update_total(&mut invoice, dec!(12345)).await.unwrap());
    assert_eq!(invoice.total(), 12_345);
}

#[tokio::test]
async fn test_update_total_rejects_invalid_value() {
    let (_db, repo) = setup().await;
    let mut invoice = repo.create(Some(dec!(100))).await.unwrap();

    assert!(!repo.update_total(&mut invoice, Decimal::ZERO).await.unwrap());
    assert_eq!(invoice.errors().on(Field::Total), vec!["must be greater than 0"]);
    assert_eq!(invoice.total(), 10_000);
    assert_eq!(repo.get(invoice.id()).await.unwrap().total(), 10_000);
}

#[tokio::test]
async fn test_delete_removes_payments() {
    let (db, repo) = setup().await;
    let mut invoice = repo.create(Some(dec!(300))).await.unwrap();
    let other = repo.create(Some(dec!(50))).await.unwrap();

    repo.record_payment(&mut invoice, dec!(100), "cash").await.unwrap();
    repo.record_payment(&mut invoice, dec!(50), "check").await.unwrap();
    repo.create_payment(other.id(), 1_000, "charge").await.unwrap();
    assert_eq!(payment_rows(&db).await, 3);

    repo.delete(invoice.id()).await.unwrap();

    assert!(repo.find(invoice.id()).await.unwrap().is_none());
    assert!(repo.payments(invoice.id()).await.unwrap().is_empty());
    assert_eq!(payment_rows(&db).await, 1);

    let survivor = repo.get(other.id()).await.unwrap();
    assert_eq!(survivor.payments()[0].method(), PaymentMethod::Charge);
}

#[tokio::test]
async fn test_delete_missing_invoice() {
    let (_db, repo) = setup().await;
    assert!(matches!(
        repo.delete(InvoiceId::new(42)).await,
        Err(InvoiceRepoError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_foreign_key_cascades_on_delete() {
    let (db, repo) = setup().await;
    let invoice = repo.create(Some(dec!(100))).await.unwrap();
    repo.create_payment(invoice.id(), 2_500, "cash").await.unwrap();

    invoices::Entity::delete_by_id(invoice.id().into_inner())
        .exec(&db)
        .await
        .unwrap();

    assert_eq!(payment_rows(&db).await, 0);
}
