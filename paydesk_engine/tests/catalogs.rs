mod support;

use std::collections::HashMap;

use paydesk_engine::{
    db_types::{NewCurrency, NewPaymentType, NewReturnType},
    traits::CatalogError,
    CatalogApi,
    OrderFlowApi,
};
use support::*;

#[tokio::test]
async fn duplicate_currency_code_or_name_is_rejected() {
    let db = new_test_db().await;
    let api = CatalogApi::new(db.clone());
    api.add_currency(&NewCurrency { code: "USD".into(), name: "US Dollar".into(), rate: 1.0 }).await.unwrap();

    let same_code = NewCurrency { code: "USD".into(), name: "Unrelated name".into(), rate: 2.0 };
    let err = api.add_currency(&same_code).await.expect_err("Duplicate code must be rejected");
    assert!(matches!(err, CatalogError::DuplicateEntry(_)));

    let same_name = NewCurrency { code: "USX".into(), name: "US Dollar".into(), rate: 2.0 };
    let err = api.add_currency(&same_name).await.expect_err("Duplicate name must be rejected");
    assert!(matches!(err, CatalogError::DuplicateEntry(_)));

    assert_eq!(api.currencies().await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_payment_type_abbreviation_is_rejected() {
    let db = new_test_db().await;
    let api = CatalogApi::new(db.clone());
    api.add_payment_type(&NewPaymentType { name: "Bank transfer".into(), abbreviation: "TRF".into() }).await.unwrap();

    let err = api
        .add_payment_type(&NewPaymentType { name: "Telegraphic transfer".into(), abbreviation: "TRF".into() })
        .await
        .expect_err("Duplicate abbreviation must be rejected");
    assert!(matches!(err, CatalogError::DuplicateEntry(_)));
}

#[tokio::test]
async fn payment_type_in_use_cannot_be_deleted() {
    let db = new_test_db().await;
    let (coordinator, _analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let catalog = CatalogApi::new(db.clone());
    let orders = OrderFlowApi::new(db.clone());

    orders.create_order(order_request(coordinator, currency, payment_type)).await.unwrap();

    let err = catalog.delete_payment_type(payment_type).await.expect_err("A referenced payment type must survive");
    assert!(matches!(err, CatalogError::EntryInUse(_)));
    assert_eq!(catalog.payment_types().await.unwrap().len(), 1, "The row must be left intact");

    // An unreferenced payment type deletes without fuss.
    let spare =
        catalog.add_payment_type(&NewPaymentType { name: "Cheque".into(), abbreviation: "CHQ".into() }).await.unwrap();
    catalog.delete_payment_type(spare.id).await.expect("Error deleting unused payment type");
}

#[tokio::test]
async fn currency_delete_is_unconditional() {
    let db = new_test_db().await;
    let (coordinator, _analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let catalog = CatalogApi::new(db.clone());
    let orders = OrderFlowApi::new(db.clone());

    orders.create_order(order_request(coordinator, currency, payment_type)).await.unwrap();
    catalog.delete_currency(currency).await.expect("Currency deletion carries no referential protection");
    assert!(catalog.currencies().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_entries_are_not_found() {
    let db = new_test_db().await;
    let api = CatalogApi::new(db.clone());

    let err = api
        .update_currency(99, &NewCurrency { code: "EUR".into(), name: "Euro".into(), rate: 0.9 })
        .await
        .expect_err("Updating a missing currency must fail");
    assert!(matches!(err, CatalogError::EntryNotFound(99)));

    let err = api.delete_return_type(99).await.expect_err("Deleting a missing return type must fail");
    assert!(matches!(err, CatalogError::EntryNotFound(99)));
}

#[tokio::test]
async fn rate_sheet_updates_matching_codes_only() {
    let db = new_test_db().await;
    let api = CatalogApi::new(db.clone());
    api.add_currency(&NewCurrency { code: "USD".into(), name: "US Dollar".into(), rate: 1.0 }).await.unwrap();
    api.add_currency(&NewCurrency { code: "EUR".into(), name: "Euro".into(), rate: 0.5 }).await.unwrap();

    let sheet: HashMap<String, f64> = [("EUR".to_string(), 0.9213), ("JPY".to_string(), 150.2)].into_iter().collect();
    let updated = api.apply_rate_sheet(&sheet).await.expect("Error applying rate sheet");
    assert_eq!(updated, 1, "JPY has no local row and must be ignored");

    let currencies = api.currencies().await.unwrap();
    let eur = currencies.iter().find(|c| c.code == "EUR").unwrap();
    let usd = currencies.iter().find(|c| c.code == "USD").unwrap();
    assert_eq!(eur.rate, 0.9213);
    assert_eq!(usd.rate, 1.0, "Codes absent from the sheet keep their rate");
}

#[tokio::test]
async fn return_type_crud_round_trip() {
    let db = new_test_db().await;
    let api = CatalogApi::new(db.clone());

    let row = api
        .add_return_type(&NewReturnType { name: "Incomplete data".into(), description: Some("Fields missing".into()) })
        .await
        .unwrap();
    let row = api
        .update_return_type(row.id, &NewReturnType { name: "Incomplete data".into(), description: None })
        .await
        .unwrap();
    assert!(row.description.is_none());

    api.add_return_type(&NewReturnType { name: "Amount mismatch".into(), description: None }).await.unwrap();
    let names: Vec<String> = api.return_types().await.unwrap().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["Amount mismatch".to_string(), "Incomplete data".to_string()]);

    api.delete_return_type(row.id).await.unwrap();
    assert_eq!(api.return_types().await.unwrap().len(), 1);
}
