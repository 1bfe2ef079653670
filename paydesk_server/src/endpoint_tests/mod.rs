//! End-to-end tests over the HTTP surface, backed by a real (temporary) SQLite store. The app
//! under test is wired with the same [`crate::server::configure`] call as the production
//! server; state persists across requests in the sqlite file, so each request can use a fresh
//! service instance.
use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use fx_feed::{FxFeedApi, FxFeedConfig};
use paydesk_engine::{
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    SqliteDatabase,
};
use serde_json::{json, Value};

use crate::server::configure;

async fn test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

/// A configure closure bound to a fresh store. Call it once per test and thread it through the
/// request helpers.
async fn test_app() -> impl Fn(&mut ServiceConfig) {
    let db = test_db().await;
    let feed = FxFeedApi::new(FxFeedConfig::default()).expect("Error creating feed client");
    move |cfg: &mut ServiceConfig| configure(cfg, db.clone(), feed.clone())
}

async fn request<F>(req: TestRequest, conf: &F) -> (StatusCode, Value)
where F: Fn(&mut ServiceConfig) {
    let service = test::init_service(App::new().configure(|cfg| conf(cfg))).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = res.into_body().try_into_bytes().unwrap();
    let value = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap_or(Value::Null) };
    (status, value)
}

async fn get<F: Fn(&mut ServiceConfig)>(conf: &F, path: &str) -> (StatusCode, Value) {
    request(TestRequest::get().uri(path), conf).await
}

async fn post_json<F: Fn(&mut ServiceConfig)>(conf: &F, path: &str, body: Value) -> (StatusCode, Value) {
    request(TestRequest::post().uri(path).set_json(body), conf).await
}

async fn put_json<F: Fn(&mut ServiceConfig)>(conf: &F, path: &str, body: Value) -> (StatusCode, Value) {
    request(TestRequest::put().uri(path).set_json(body), conf).await
}

async fn delete<F: Fn(&mut ServiceConfig)>(conf: &F, path: &str) -> (StatusCode, Value) {
    request(TestRequest::delete().uri(path), conf).await
}

/// Registers one coordinator and one analyst and seeds the two catalogs, all over HTTP.
/// Returns (coordinator_id, analyst_id, currency_id, payment_type_id).
async fn seed_basics<F: Fn(&mut ServiceConfig)>(conf: &F) -> (i64, i64, i64, i64) {
    let (status, coordinator) = post_json(
        conf,
        "/api/auth/register",
        json!({
            "first_name": "Lucia", "last_name": "Fernandez", "email": "lucia@paydesk.test",
            "password": "correct horse battery staple", "role": "Coordinator"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, analyst) = post_json(
        conf,
        "/api/auth/register",
        json!({
            "first_name": "Marco", "last_name": "Reyes", "email": "marco@paydesk.test",
            "password": "correct horse battery staple", "role": "Analyst"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, currency) =
        post_json(conf, "/api/catalogs/currencies", json!({"code": "USD", "name": "US Dollar", "rate": 1.0})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, payment_type) =
        post_json(conf, "/api/catalogs/payment-types", json!({"name": "Bank transfer", "abbreviation": "TRF"})).await;
    assert_eq!(status, StatusCode::CREATED);
    (
        coordinator["id"].as_i64().unwrap(),
        analyst["id"].as_i64().unwrap(),
        currency["id"].as_i64().unwrap(),
        payment_type["id"].as_i64().unwrap(),
    )
}

fn order_body(coordinator: i64, currency: i64, payment_type: i64) -> Value {
    json!({
        "coordinator_id": coordinator,
        "amount": 500.0,
        "currency_id": currency,
        "payment_type_id": payment_type,
        "invoice_date": "2024-01-01",
        "due_date": "2024-01-15",
        "creditor": "ACME Corp"
    })
}

#[actix_web::test]
async fn health_check() {
    let app = test::init_service(App::new().service(crate::routes::health)).await;
    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn full_order_flow_over_http() {
    let _ = env_logger::try_init().ok();
    let conf = test_app().await;
    let (coordinator, analyst, currency, payment_type) = seed_basics(&conf).await;

    let (status, order) = post_json(&conf, "/api/orders", order_body(coordinator, currency, payment_type)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "Created");
    assert_eq!(order["amount"], 500.0);
    assert!(order["paid_on"].is_null());
    let id = order["id"].as_i64().unwrap();

    let (status, order) = put_json(&conf, &format!("/api/orders/{id}/send"), json!({"actor_id": coordinator})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "Sent");

    let (status, queue) = get(&conf, "/api/orders/sent?search=acme").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(queue.as_array().unwrap().len(), 1);
    assert_eq!(queue[0]["coordinator_first_name"], "Lucia");

    let (status, order) = put_json(&conf, &format!("/api/orders/{id}/pay"), json!({"analyst_id": analyst})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "Paid");
    assert!(order["paid_on"].is_string());

    let (status, detail) = get(&conf, &format!("/api/orders/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["status"], "Paid");

    let (status, log) = get(&conf, "/api/audit-log").await;
    assert_eq!(status, StatusCode::OK);
    let log = log.as_array().unwrap();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0]["action"], "PayOrder");
    assert_eq!(log[0]["first_name"], "Marco");
    assert_eq!(log[2]["action"], "CreateOrder");

    let (status, summary) = get(&conf, "/api/reports/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_paid_orders"], 1);
}

#[actix_web::test]
async fn missing_required_fields_are_bad_request() {
    let conf = test_app().await;
    let (status, body) = post_json(&conf, "/api/orders", json!({"amount": 500.0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn unknown_order_is_not_found() {
    let conf = test_app().await;
    let (status, body) = get(&conf, "/api/orders/4242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn illegal_transition_is_a_conflict() {
    let conf = test_app().await;
    let (coordinator, analyst, currency, payment_type) = seed_basics(&conf).await;

    let (_, order) = post_json(&conf, "/api/orders", order_body(coordinator, currency, payment_type)).await;
    let id = order["id"].as_i64().unwrap();

    // Paying an order that was never sent for review.
    let (status, body) = put_json(&conf, &format!("/api/orders/{id}/pay"), json!({"analyst_id": analyst})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn login_round_trip() {
    let conf = test_app().await;
    seed_basics(&conf).await;

    let (status, profile) = post_json(
        &conf,
        "/api/auth/login",
        json!({"email": "lucia@paydesk.test", "password": "correct horse battery staple"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["role"], "Coordinator");
    assert!(profile.get("password_hash").is_none(), "The hash must never be serialized");

    let (status, body) =
        post_json(&conf, "/api/auth/login", json!({"email": "lucia@paydesk.test", "password": "nope"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn duplicate_catalog_entries_are_conflicts() {
    let conf = test_app().await;

    let body = json!({"code": "USD", "name": "US Dollar", "rate": 1.0});
    let (status, _) = post_json(&conf, "/api/catalogs/currencies", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, err) = post_json(&conf, "/api/catalogs/currencies", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(err["error"].is_string());
}

#[actix_web::test]
async fn referenced_payment_type_cannot_be_deleted_over_http() {
    let conf = test_app().await;
    let (coordinator, _analyst, currency, payment_type) = seed_basics(&conf).await;

    post_json(&conf, "/api/orders", order_body(coordinator, currency, payment_type)).await;
    let (status, body) = delete(&conf, &format!("/api/catalogs/payment-types/{payment_type}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (_, types) = get(&conf, "/api/catalogs/payment-types").await;
    assert_eq!(types.as_array().unwrap().len(), 1, "The row must be left intact");
}
