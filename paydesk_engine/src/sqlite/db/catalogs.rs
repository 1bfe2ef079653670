use std::collections::HashMap;

use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Currency, NewCurrency, NewPaymentType, NewReturnType, PaymentType, ReturnType},
    traits::CatalogError,
};

//--------------------------------------     Currencies      ---------------------------------------------------------
pub(crate) async fn currencies(conn: &mut SqliteConnection) -> Result<Vec<Currency>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM currencies ORDER BY name ASC").fetch_all(&mut *conn).await
}

pub(crate) async fn insert_currency(
    currency: &NewCurrency,
    conn: &mut SqliteConnection,
) -> Result<Currency, CatalogError> {
    let row = sqlx::query_as("INSERT INTO currencies (code, name, rate) VALUES ($1, $2, $3) RETURNING *")
        .bind(&currency.code)
        .bind(&currency.name)
        .bind(currency.rate)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row)
}

pub(crate) async fn update_currency(
    id: i64,
    currency: &NewCurrency,
    conn: &mut SqliteConnection,
) -> Result<Currency, CatalogError> {
    let row: Option<Currency> = sqlx::query_as(
        "UPDATE currencies SET code = $1, name = $2, rate = $3, updated_at = CURRENT_TIMESTAMP WHERE id = $4 \
         RETURNING *",
    )
    .bind(&currency.code)
    .bind(&currency.name)
    .bind(currency.rate)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    row.ok_or(CatalogError::EntryNotFound(id))
}

pub(crate) async fn delete_currency(id: i64, conn: &mut SqliteConnection) -> Result<(), CatalogError> {
    let result = sqlx::query("DELETE FROM currencies WHERE id = $1").bind(id).execute(&mut *conn).await?;
    if result.rows_affected() == 0 {
        return Err(CatalogError::EntryNotFound(id));
    }
    Ok(())
}

/// Overwrites the rate of every currency whose code appears in the sheet. Codes without a
/// local row fall through silently. Returns the number of currencies touched.
pub(crate) async fn apply_rate_sheet(
    rates: &HashMap<String, f64>,
    conn: &mut SqliteConnection,
) -> Result<u64, CatalogError> {
    let mut updated = 0u64;
    for (code, rate) in rates {
        let result =
            sqlx::query("UPDATE currencies SET rate = $1, updated_at = CURRENT_TIMESTAMP WHERE code = $2")
                .bind(rate)
                .bind(code)
                .execute(&mut *conn)
                .await?;
        updated += result.rows_affected();
    }
    trace!("🗃️ Rate sheet applied to {updated} currencies");
    Ok(updated)
}

//--------------------------------------    Payment types    ---------------------------------------------------------
pub(crate) async fn payment_types(conn: &mut SqliteConnection) -> Result<Vec<PaymentType>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM payment_types ORDER BY name ASC").fetch_all(&mut *conn).await
}

pub(crate) async fn insert_payment_type(
    payment_type: &NewPaymentType,
    conn: &mut SqliteConnection,
) -> Result<PaymentType, CatalogError> {
    let row = sqlx::query_as("INSERT INTO payment_types (name, abbreviation) VALUES ($1, $2) RETURNING *")
        .bind(&payment_type.name)
        .bind(&payment_type.abbreviation)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row)
}

pub(crate) async fn update_payment_type(
    id: i64,
    payment_type: &NewPaymentType,
    conn: &mut SqliteConnection,
) -> Result<PaymentType, CatalogError> {
    let row: Option<PaymentType> =
        sqlx::query_as("UPDATE payment_types SET name = $1, abbreviation = $2 WHERE id = $3 RETURNING *")
            .bind(&payment_type.name)
            .bind(&payment_type.abbreviation)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
    row.ok_or(CatalogError::EntryNotFound(id))
}

/// Fails with [`CatalogError::EntryInUse`] while any order references the payment type; the
/// foreign key does the checking.
pub(crate) async fn delete_payment_type(id: i64, conn: &mut SqliteConnection) -> Result<(), CatalogError> {
    let result = sqlx::query("DELETE FROM payment_types WHERE id = $1").bind(id).execute(&mut *conn).await?;
    if result.rows_affected() == 0 {
        return Err(CatalogError::EntryNotFound(id));
    }
    Ok(())
}

//--------------------------------------     Return types    ---------------------------------------------------------
pub(crate) async fn return_types(conn: &mut SqliteConnection) -> Result<Vec<ReturnType>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM return_types ORDER BY name ASC").fetch_all(&mut *conn).await
}

pub(crate) async fn insert_return_type(
    return_type: &NewReturnType,
    conn: &mut SqliteConnection,
) -> Result<ReturnType, CatalogError> {
    let row = sqlx::query_as("INSERT INTO return_types (name, description) VALUES ($1, $2) RETURNING *")
        .bind(&return_type.name)
        .bind(&return_type.description)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row)
}

pub(crate) async fn update_return_type(
    id: i64,
    return_type: &NewReturnType,
    conn: &mut SqliteConnection,
) -> Result<ReturnType, CatalogError> {
    let row: Option<ReturnType> =
        sqlx::query_as("UPDATE return_types SET name = $1, description = $2 WHERE id = $3 RETURNING *")
            .bind(&return_type.name)
            .bind(&return_type.description)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
    row.ok_or(CatalogError::EntryNotFound(id))
}

pub(crate) async fn delete_return_type(id: i64, conn: &mut SqliteConnection) -> Result<(), CatalogError> {
    let result = sqlx::query("DELETE FROM return_types WHERE id = $1").bind(id).execute(&mut *conn).await?;
    if result.rows_affected() == 0 {
        return Err(CatalogError::EntryNotFound(id));
    }
    Ok(())
}
