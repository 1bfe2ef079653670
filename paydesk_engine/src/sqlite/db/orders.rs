use chrono::NaiveDate;
use log::trace;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderStatus},
    order_objects::{
        CoordinatorOrderQuery,
        CoordinatorOrderSummary,
        HistoryQuery,
        OrderUpdate,
        OrderWithContext,
        SentOrderQuery,
    },
    traits::PaymentOrderError,
};

/// Inserts a new order using the given connection. This is not atomic on its own. Embed the
/// call inside a transaction and pass `&mut tx` as the connection argument to pair it with the
/// audit insert.
pub(crate) async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, PaymentOrderError> {
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                amount,
                currency_id,
                payment_type_id,
                invoice_date,
                due_date,
                urgent,
                tax,
                discount,
                creditor,
                offset_document,
                coordinator_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *;
        "#,
    )
    .bind(order.amount.value())
    .bind(order.currency_id)
    .bind(order.payment_type_id)
    .bind(order.invoice_date)
    .bind(order.due_date)
    .bind(order.urgent)
    .bind(order.tax.value())
    .bind(order.discount.value())
    .bind(order.creditor)
    .bind(order.offset_document)
    .bind(order.coordinator_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(order)
}

pub(crate) async fn fetch_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(&mut *conn).await?;
    Ok(order)
}

pub(crate) async fn update_status(
    id: i64,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Order, PaymentOrderError> {
    let result: Option<Order> =
        sqlx::query_as("UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *")
            .bind(status.to_string())
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
    result.ok_or(PaymentOrderError::OrderNotFound(id))
}

/// Marks the order as paid, stamping `paid_on`. This is the only write path for `paid_on`.
pub(crate) async fn mark_paid(
    id: i64,
    paid_on: NaiveDate,
    conn: &mut SqliteConnection,
) -> Result<Order, PaymentOrderError> {
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET status = 'Paid', paid_on = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(paid_on)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    result.ok_or(PaymentOrderError::OrderNotFound(id))
}

/// Overwrites the reviewable fields and force-resets the status to `Created`, whatever it was.
/// Returns `None` if the order does not exist.
pub(crate) async fn update_order(
    id: i64,
    update: &OrderUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, PaymentOrderError> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders SET
                amount = $1,
                currency_id = $2,
                payment_type_id = $3,
                invoice_date = $4,
                due_date = $5,
                status = 'Created',
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $6
            RETURNING *;
        "#,
    )
    .bind(update.amount.value())
    .bind(update.currency_id)
    .bind(update.payment_type_id)
    .bind(update.invoice_date)
    .bind(update.due_date)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(order)
}

/// A coordinator's own orders, newest-created-first, with optional exact status and
/// payment-type filters.
pub(crate) async fn orders_for_coordinator(
    coordinator_id: i64,
    query: &CoordinatorOrderQuery,
    conn: &mut SqliteConnection,
) -> Result<Vec<CoordinatorOrderSummary>, sqlx::Error> {
    let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
        r#"
    SELECT
        o.id,
        o.amount,
        o.urgent,
        o.status,
        o.paid_on,
        c.code AS currency_code,
        pt.name AS payment_type
    FROM orders o
    JOIN currencies c ON o.currency_id = c.id
    JOIN payment_types pt ON o.payment_type_id = pt.id
    WHERE o.coordinator_id = "#,
    );
    builder.push_bind(coordinator_id);
    if let Some(status) = query.status {
        builder.push(" AND o.status = ").push_bind(status.to_string());
    }
    if let Some(payment_type_id) = query.payment_type {
        builder.push(" AND o.payment_type_id = ").push_bind(payment_type_id);
    }
    builder.push(" ORDER BY o.created_at DESC, o.id DESC");
    trace!("🗃️ Executing query: {}", builder.sql());
    builder.build_query_as::<CoordinatorOrderSummary>().fetch_all(&mut *conn).await
}

/// The review queue: `Sent` orders only, urgent-first then earliest due date first.
pub(crate) async fn sent_orders(
    query: &SentOrderQuery,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderWithContext>, sqlx::Error> {
    let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
        r#"
    SELECT
        o.*,
        c.code AS currency_code,
        u.first_name AS coordinator_first_name,
        u.last_name AS coordinator_last_name
    FROM orders o
    JOIN currencies c ON o.currency_id = c.id
    JOIN users u ON o.coordinator_id = u.id
    WHERE o.status = 'Sent'"#,
    );
    push_search_clause(&mut builder, query.search.as_deref());
    if let Some(urgent) = query.urgent {
        builder.push(" AND o.urgent = ").push_bind(urgent);
    }
    builder.push(" ORDER BY o.urgent DESC, o.due_date ASC");
    trace!("🗃️ Executing query: {}", builder.sql());
    builder.build_query_as::<OrderWithContext>().fetch_all(&mut *conn).await
}

/// Every order regardless of status, newest-id-first.
pub(crate) async fn order_history(
    query: &HistoryQuery,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderWithContext>, sqlx::Error> {
    let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
        r#"
    SELECT
        o.*,
        c.code AS currency_code,
        u.first_name AS coordinator_first_name,
        u.last_name AS coordinator_last_name
    FROM orders o
    JOIN currencies c ON o.currency_id = c.id
    JOIN users u ON o.coordinator_id = u.id
    WHERE 1 = 1"#,
    );
    push_search_clause(&mut builder, query.search.as_deref());
    if let Some(status) = query.status {
        builder.push(" AND o.status = ").push_bind(status.to_string());
    }
    builder.push(" ORDER BY o.id DESC");
    trace!("🗃️ Executing query: {}", builder.sql());
    builder.build_query_as::<OrderWithContext>().fetch_all(&mut *conn).await
}

/// Matches the creditor name or the coordinator's first/last name, case-insensitively. An
/// empty term adds no clause at all.
fn push_search_clause(builder: &mut QueryBuilder<'_, Sqlite>, term: Option<&str>) {
    let Some(term) = term.filter(|t| !t.is_empty()) else {
        return;
    };
    let like = format!("%{term}%");
    builder
        .push(" AND (o.creditor LIKE ")
        .push_bind(like.clone())
        .push(" OR u.first_name LIKE ")
        .push_bind(like.clone())
        .push(" OR u.last_name LIKE ")
        .push_bind(like)
        .push(")");
}
