mod support;

use paydesk_engine::{
    db_types::{AuditAction, NewPaymentType},
    AuditApi,
    CatalogApi,
    OrderFlowApi,
    ReportApi,
};
use support::*;

#[tokio::test]
async fn summary_counts_reflect_the_ledger() {
    let db = new_test_db().await;
    let (coordinator, analyst) = seed_actors(&db).await;
    let (currency, transfer) = seed_catalogs(&db).await;
    let cheque = CatalogApi::new(db.clone())
        .add_payment_type(&NewPaymentType { name: "Cheque".into(), abbreviation: "CHQ".into() })
        .await
        .unwrap()
        .id;
    let api = OrderFlowApi::new(db.clone());

    let first = api.create_order(order_request(coordinator, currency, transfer)).await.unwrap();
    let second = api.create_order(order_request(coordinator, currency, transfer)).await.unwrap();
    let third = api.create_order(order_request(coordinator, currency, cheque)).await.unwrap();

    api.send_order(first.id, coordinator).await.unwrap();
    api.send_order(second.id, coordinator).await.unwrap();
    api.pay_order(first.id, analyst).await.unwrap();
    api.return_order(second.id, analyst, Some("Amount mismatch")).await.unwrap();
    let _ = third; // stays in Created

    let summary = ReportApi::new(db.clone()).summary().await.expect("Error computing summary");

    assert_eq!(summary.orders_per_coordinator.len(), 1);
    assert_eq!(summary.orders_per_coordinator[0].coordinator, "Lucia Fernandez");
    assert_eq!(summary.orders_per_coordinator[0].total_orders, 3);

    assert_eq!(summary.actions_per_analyst.len(), 1);
    assert_eq!(summary.actions_per_analyst[0].analyst, "Marco Reyes");
    assert_eq!(summary.actions_per_analyst[0].total_actions, 2, "One pay plus one return");

    let mut per_type: Vec<(String, i64)> =
        summary.orders_per_payment_type.iter().map(|r| (r.payment_type.clone(), r.total)).collect();
    per_type.sort();
    assert_eq!(per_type, vec![("Bank transfer".to_string(), 2), ("Cheque".to_string(), 1)]);

    assert_eq!(summary.total_paid_orders, 1);
}

#[tokio::test]
async fn audit_log_lists_newest_first_with_actor_names() {
    let db = new_test_db().await;
    let (coordinator, analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let order = api.create_order(order_request(coordinator, currency, payment_type)).await.unwrap();
    api.send_order(order.id, coordinator).await.unwrap();
    api.pay_order(order.id, analyst).await.unwrap();

    let log = AuditApi::new(db.clone()).list_entries().await.unwrap();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].action, AuditAction::PayOrder);
    assert_eq!(log[0].first_name, "Marco");
    assert_eq!(log[2].action, AuditAction::CreateOrder);
    assert_eq!(log[2].last_name, "Fernandez");
    assert!(log.windows(2).all(|w| w[0].id > w[1].id), "Ties on the timestamp fall back to insertion order");
}
