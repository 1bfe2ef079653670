mod support;

use chrono::Utc;
use paydesk_engine::{
    db_types::{AuditAction, Money, OrderStatus, DEFAULT_RETURN_REASON},
    order_objects::{CoordinatorOrderQuery, HistoryQuery, OrderUpdate, SentOrderQuery},
    traits::PaymentOrderError,
    AuditApi,
    OrderFlowApi,
};
use support::*;

#[tokio::test]
async fn create_order_starts_created_and_is_audited() {
    let db = new_test_db().await;
    let (coordinator, _analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let order = api.create_order(order_request(coordinator, currency, payment_type)).await.expect("Error creating order");
    assert_eq!(order.status, OrderStatus::Created);
    assert!(order.paid_on.is_none());
    assert_eq!(order.amount, Money::from_major(500));

    let log = AuditApi::new(db.clone()).list_entries().await.expect("Error fetching audit log");
    let entries: Vec<_> = log.iter().filter(|e| e.order_id == Some(order.id)).collect();
    assert_eq!(entries.len(), 1, "Exactly one audit entry must reference the new order");
    assert_eq!(entries[0].action, AuditAction::CreateOrder);
    assert!(entries[0].details.as_deref().unwrap_or_default().contains("500.00"));
    assert_eq!(entries[0].actor_id, coordinator);
}

#[tokio::test]
async fn full_lifecycle_create_send_pay() {
    let db = new_test_db().await;
    let (coordinator, analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let order = api.create_order(order_request(coordinator, currency, payment_type)).await.unwrap();
    let order = api.send_order(order.id, coordinator).await.expect("Error sending order");
    assert_eq!(order.status, OrderStatus::Sent);

    let order = api.pay_order(order.id, analyst).await.expect("Error paying order");
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.paid_on, Some(Utc::now().date_naive()));

    let log = AuditApi::new(db.clone()).list_entries().await.unwrap();
    let actions: Vec<AuditAction> =
        log.iter().filter(|e| e.order_id == Some(order.id)).map(|e| e.action).collect();
    // Newest first: Pay, Send, Create.
    assert_eq!(actions, vec![AuditAction::PayOrder, AuditAction::SendOrder, AuditAction::CreateOrder]);
}

#[tokio::test]
async fn send_requires_created_or_returned() {
    let db = new_test_db().await;
    let (coordinator, analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let order = api.create_order(order_request(coordinator, currency, payment_type)).await.unwrap();
    api.send_order(order.id, coordinator).await.unwrap();

    let err = api.send_order(order.id, coordinator).await.expect_err("Sending a Sent order must fail");
    assert!(matches!(err, PaymentOrderError::InvalidTransition { from: OrderStatus::Sent, to: OrderStatus::Sent }));

    api.pay_order(order.id, analyst).await.unwrap();
    let err = api.send_order(order.id, coordinator).await.expect_err("Sending a Paid order must fail");
    assert!(matches!(err, PaymentOrderError::InvalidTransition { from: OrderStatus::Paid, to: OrderStatus::Sent }));
}

#[tokio::test]
async fn pay_twice_is_rejected_and_does_not_restamp() {
    let db = new_test_db().await;
    let (coordinator, analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let order = api.create_order(order_request(coordinator, currency, payment_type)).await.unwrap();
    api.send_order(order.id, coordinator).await.unwrap();
    let paid = api.pay_order(order.id, analyst).await.unwrap();

    let err = api.pay_order(order.id, analyst).await.expect_err("Double payment must be rejected");
    assert!(matches!(err, PaymentOrderError::InvalidTransition { from: OrderStatus::Paid, to: OrderStatus::Paid }));

    let unchanged = api.fetch_order(order.id).await.unwrap();
    assert_eq!(unchanged.paid_on, paid.paid_on);
    let log = AuditApi::new(db.clone()).list_entries().await.unwrap();
    assert_eq!(log.iter().filter(|e| e.action == AuditAction::PayOrder).count(), 1);
}

#[tokio::test]
async fn return_files_a_record_with_the_default_reason() {
    let db = new_test_db().await;
    let (coordinator, analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let order = api.create_order(order_request(coordinator, currency, payment_type)).await.unwrap();
    api.send_order(order.id, coordinator).await.unwrap();
    let order = api.return_order(order.id, analyst, None).await.expect("Error returning order");
    assert_eq!(order.status, OrderStatus::Returned);

    let records = api.returns_for_order(order.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reason, DEFAULT_RETURN_REASON);
    assert_eq!(records[0].analyst_id, analyst);

    let log = AuditApi::new(db.clone()).list_entries().await.unwrap();
    let entry = log.iter().find(|e| e.action == AuditAction::ReturnOrder).expect("Return must be audited");
    assert!(entry.details.as_deref().unwrap_or_default().contains(DEFAULT_RETURN_REASON));
}

#[tokio::test]
async fn each_return_accumulates_a_record() {
    let db = new_test_db().await;
    let (coordinator, analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let order = api.create_order(order_request(coordinator, currency, payment_type)).await.unwrap();
    api.send_order(order.id, coordinator).await.unwrap();
    api.return_order(order.id, analyst, Some("Missing invoice number")).await.unwrap();

    // Resubmission straight from Returned is allowed; the analyst bounces it again.
    api.send_order(order.id, coordinator).await.unwrap();
    api.return_order(order.id, analyst, Some("Wrong creditor")).await.unwrap();

    let records = api.returns_for_order(order.id).await.unwrap();
    let reasons: Vec<&str> = records.iter().map(|r| r.reason.as_str()).collect();
    assert_eq!(reasons, vec!["Missing invoice number", "Wrong creditor"]);
}

#[tokio::test]
async fn return_requires_sent_status() {
    let db = new_test_db().await;
    let (coordinator, analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let order = api.create_order(order_request(coordinator, currency, payment_type)).await.unwrap();
    let err = api.return_order(order.id, analyst, None).await.expect_err("Returning a Created order must fail");
    assert!(matches!(
        err,
        PaymentOrderError::InvalidTransition { from: OrderStatus::Created, to: OrderStatus::Returned }
    ));
    assert!(api.returns_for_order(order.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn edit_resets_status_even_when_paid() {
    let db = new_test_db().await;
    let (coordinator, analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let order = api.create_order(order_request(coordinator, currency, payment_type)).await.unwrap();
    api.send_order(order.id, coordinator).await.unwrap();
    api.pay_order(order.id, analyst).await.unwrap();

    let update = OrderUpdate {
        amount: Money::from_major(750),
        currency_id: currency,
        payment_type_id: payment_type,
        invoice_date: date(2024, 1, 2),
        due_date: date(2024, 1, 20),
    };
    let order = api.edit_order(order.id, coordinator, &update).await.expect("Error editing order");
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.amount, Money::from_major(750));
    assert_eq!(order.due_date, date(2024, 1, 20));

    let log = AuditApi::new(db.clone()).list_entries().await.unwrap();
    assert_eq!(log.iter().filter(|e| e.action == AuditAction::EditOrder).count(), 1);
}

#[tokio::test]
async fn audit_failure_rolls_back_the_transition() {
    let db = new_test_db().await;
    let (coordinator, _analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let order = api.create_order(order_request(coordinator, currency, payment_type)).await.unwrap();

    // Actor 9999 does not exist, so the audit insert fails its foreign key and the whole
    // transaction, including the status update, must be rolled back.
    let err = api.send_order(order.id, 9999).await.expect_err("Unknown actor must fail the send");
    assert!(matches!(err, PaymentOrderError::IntegrityViolation(_)));

    let unchanged = api.fetch_order(order.id).await.unwrap();
    assert_eq!(unchanged.status, OrderStatus::Created);
    let log = AuditApi::new(db.clone()).list_entries().await.unwrap();
    assert_eq!(log.iter().filter(|e| e.order_id == Some(order.id)).count(), 1, "Only the create entry may exist");
}

#[tokio::test]
async fn operations_on_unknown_orders_are_not_found() {
    let db = new_test_db().await;
    let (_coordinator, analyst) = seed_actors(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let err = api.pay_order(4242, analyst).await.expect_err("Paying a missing order must fail");
    assert!(matches!(err, PaymentOrderError::OrderNotFound(4242)));
    let err = api.fetch_order(4242).await.expect_err("Fetching a missing order must fail");
    assert!(matches!(err, PaymentOrderError::OrderNotFound(4242)));
}

#[tokio::test]
async fn sent_orders_filtering_and_ordering() {
    let db = new_test_db().await;
    let (coordinator, _analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let mut plain = order_request(coordinator, currency, payment_type).with_creditor("ACME Corp");
    plain.due_date = date(2024, 2, 10);
    let plain = api.create_order(plain).await.unwrap();

    let mut rush_late = order_request(coordinator, currency, payment_type).urgent().with_creditor("Velocity Freight");
    rush_late.due_date = date(2024, 3, 1);
    let rush_late = api.create_order(rush_late).await.unwrap();

    let mut rush_early = order_request(coordinator, currency, payment_type).urgent().with_creditor("Acme Steel");
    rush_early.due_date = date(2024, 2, 1);
    let rush_early = api.create_order(rush_early).await.unwrap();

    // Never sent, must never appear in the queue.
    let unsent = api.create_order(order_request(coordinator, currency, payment_type)).await.unwrap();

    for id in [plain.id, rush_late.id, rush_early.id] {
        api.send_order(id, coordinator).await.unwrap();
    }

    let queue = api.sent_orders(&SentOrderQuery::default()).await.unwrap();
    let ids: Vec<i64> = queue.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![rush_early.id, rush_late.id, plain.id], "Urgent first, then earliest due date");
    assert!(queue.iter().all(|o| o.status == OrderStatus::Sent));
    assert!(!ids.contains(&unsent.id));

    let urgent_only = api.sent_orders(&SentOrderQuery::default().urgent_only()).await.unwrap();
    assert_eq!(urgent_only.iter().map(|o| o.id).collect::<Vec<_>>(), vec![rush_early.id, rush_late.id]);

    let non_urgent = api.sent_orders(&SentOrderQuery::default().non_urgent_only()).await.unwrap();
    assert_eq!(non_urgent.iter().map(|o| o.id).collect::<Vec<_>>(), vec![plain.id]);

    // Case-insensitive substring on the creditor name.
    let acme = api.sent_orders(&SentOrderQuery::default().with_search("acme")).await.unwrap();
    assert_eq!(acme.iter().map(|o| o.id).collect::<Vec<_>>(), vec![rush_early.id, plain.id]);
}

#[tokio::test]
async fn history_search_matches_creditor_and_coordinator() {
    let db = new_test_db().await;
    let (coordinator, analyst) = seed_actors(&db).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let first =
        api.create_order(order_request(coordinator, currency, payment_type).with_creditor("ACME Corp")).await.unwrap();
    let second =
        api.create_order(order_request(coordinator, currency, payment_type).with_creditor("Globex")).await.unwrap();
    api.send_order(second.id, coordinator).await.unwrap();
    api.pay_order(second.id, analyst).await.unwrap();

    // Empty search term returns everything, newest id first, regardless of status.
    let all = api.order_history(&HistoryQuery::default()).await.unwrap();
    assert_eq!(all.iter().map(|o| o.id).collect::<Vec<_>>(), vec![second.id, first.id]);

    let acme = api.order_history(&HistoryQuery::default().with_search("acme")).await.unwrap();
    assert_eq!(acme.iter().map(|o| o.id).collect::<Vec<_>>(), vec![first.id]);

    // The coordinator's last name matches too, so both orders surface.
    let by_name = api.order_history(&HistoryQuery::default().with_search("fernandez")).await.unwrap();
    assert_eq!(by_name.len(), 2);
    assert_eq!(by_name[0].coordinator_last_name, "Fernandez");

    let paid = api.order_history(&HistoryQuery::default().with_status(OrderStatus::Paid)).await.unwrap();
    assert_eq!(paid.iter().map(|o| o.id).collect::<Vec<_>>(), vec![second.id]);
}

#[tokio::test]
async fn orders_for_coordinator_is_scoped_and_filtered() {
    let db = new_test_db().await;
    let (coordinator, _analyst) = seed_actors(&db).await;
    let other = register_user(&db, "Sofia", "Mendez", "sofia@paydesk.test", paydesk_engine::db_types::Role::Coordinator).await;
    let (currency, payment_type) = seed_catalogs(&db).await;
    let api = OrderFlowApi::new(db.clone());

    let mine = api.create_order(order_request(coordinator, currency, payment_type)).await.unwrap();
    let theirs = api.create_order(order_request(other, currency, payment_type)).await.unwrap();
    api.send_order(mine.id, coordinator).await.unwrap();

    let own = api.orders_for_coordinator(coordinator, &CoordinatorOrderQuery::default()).await.unwrap();
    assert_eq!(own.iter().map(|o| o.id).collect::<Vec<_>>(), vec![mine.id]);
    assert_eq!(own[0].currency_code, "USD");
    assert_eq!(own[0].payment_type, "Bank transfer");

    let sent = api
        .orders_for_coordinator(coordinator, &CoordinatorOrderQuery::default().with_status(OrderStatus::Sent))
        .await
        .unwrap();
    assert_eq!(sent.len(), 1);

    let created = api
        .orders_for_coordinator(coordinator, &CoordinatorOrderQuery::default().with_status(OrderStatus::Created))
        .await
        .unwrap();
    assert!(created.is_empty());

    let other_orders = api.orders_for_coordinator(other, &CoordinatorOrderQuery::default()).await.unwrap();
    assert_eq!(other_orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![theirs.id]);
}
