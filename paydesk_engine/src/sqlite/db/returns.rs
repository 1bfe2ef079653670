use sqlx::SqliteConnection;

use crate::{db_types::OrderReturn, traits::PaymentOrderError};

pub(crate) async fn insert_return(
    order_id: i64,
    reason: &str,
    analyst_id: i64,
    conn: &mut SqliteConnection,
) -> Result<OrderReturn, PaymentOrderError> {
    let record =
        sqlx::query_as("INSERT INTO order_returns (order_id, reason, analyst_id) VALUES ($1, $2, $3) RETURNING *")
            .bind(order_id)
            .bind(reason)
            .bind(analyst_id)
            .fetch_one(&mut *conn)
            .await?;
    Ok(record)
}

pub(crate) async fn returns_for_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderReturn>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_returns WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await
}
