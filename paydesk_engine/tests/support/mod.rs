#![allow(dead_code)]
use chrono::NaiveDate;
use paydesk_engine::{
    db_types::{Money, NewCurrency, NewOrder, NewPaymentType, NewUser, Role},
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    CatalogApi,
    SqliteDatabase,
    UserApi,
};

/// Spins up a fresh, fully migrated store under a unique temp path.
pub async fn new_test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

pub async fn register_user(db: &SqliteDatabase, first: &str, last: &str, email: &str, role: Role) -> i64 {
    let api = UserApi::new(db.clone());
    let user = api
        .register_user(&NewUser {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$not-a-real-hash".to_string(),
            role,
        })
        .await
        .expect("Error registering user");
    user.id
}

/// One coordinator and one analyst, enough for most lifecycle tests.
pub async fn seed_actors(db: &SqliteDatabase) -> (i64, i64) {
    let coordinator = register_user(db, "Lucia", "Fernandez", "lucia@paydesk.test", Role::Coordinator).await;
    let analyst = register_user(db, "Marco", "Reyes", "marco@paydesk.test", Role::Analyst).await;
    (coordinator, analyst)
}

/// A USD currency and a bank-transfer payment type. Returns their ids.
pub async fn seed_catalogs(db: &SqliteDatabase) -> (i64, i64) {
    let api = CatalogApi::new(db.clone());
    let usd = api
        .add_currency(&NewCurrency { code: "USD".to_string(), name: "US Dollar".to_string(), rate: 1.0 })
        .await
        .expect("Error adding currency");
    let transfer = api
        .add_payment_type(&NewPaymentType { name: "Bank transfer".to_string(), abbreviation: "TRF".to_string() })
        .await
        .expect("Error adding payment type");
    (usd.id, transfer.id)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The worked example from the handbook: 500.00, invoiced new year's day, due mid-January.
pub fn order_request(coordinator_id: i64, currency_id: i64, payment_type_id: i64) -> NewOrder {
    NewOrder::new(
        coordinator_id,
        Money::from_major(500),
        currency_id,
        payment_type_id,
        date(2024, 1, 1),
        date(2024, 1, 15),
    )
}
