//! # SQLite database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are maintained by simple functions (rather than stateful structs)
//! that accept a `&mut SqliteConnection` argument. Callers can obtain a connection from a pool,
//! or create an atomic transaction as the need arises and call through to the functions without
//! any other changes.
use std::{env, str::FromStr};

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod audit;
pub mod catalogs;
pub mod orders;
pub mod reports;
pub mod returns;
pub mod users;

const SQLITE_DB_URL: &str = "sqlite://data/paydesk.db";

pub fn db_url() -> String {
    let result = env::var("PAYDESK_DATABASE_URL").unwrap_or_else(|_| {
        info!("PAYDESK_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

/// Creates the connection pool. Foreign keys are enforced on every connection; the audit
/// atomicity guarantee depends on it.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true).foreign_keys(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}
