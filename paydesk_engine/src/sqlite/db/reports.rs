use sqlx::SqliteConnection;

use crate::api::report_objects::{AnalystActionCount, CoordinatorOrderCount, PaymentTypeCount, ReportSummary};

/// Recomputes the full management summary. The caller supplies the connection, so wrapping the
/// four reads in one transaction is its choice.
pub(crate) async fn summary(conn: &mut SqliteConnection) -> Result<ReportSummary, sqlx::Error> {
    let orders_per_coordinator: Vec<CoordinatorOrderCount> = sqlx::query_as(
        r#"
        SELECT u.first_name || ' ' || u.last_name AS coordinator, COUNT(o.id) AS total_orders
        FROM orders o
        JOIN users u ON o.coordinator_id = u.id
        GROUP BY o.coordinator_id
        ORDER BY total_orders DESC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let actions_per_analyst: Vec<AnalystActionCount> = sqlx::query_as(
        r#"
        SELECT u.first_name || ' ' || u.last_name AS analyst, COUNT(b.id) AS total_actions
        FROM audit_log b
        JOIN users u ON b.actor_id = u.id
        WHERE b.action IN ('PayOrder', 'ReturnOrder')
        GROUP BY b.actor_id
        ORDER BY total_actions DESC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let orders_per_payment_type: Vec<PaymentTypeCount> = sqlx::query_as(
        r#"
        SELECT pt.name AS payment_type, COUNT(o.id) AS total
        FROM orders o
        JOIN payment_types pt ON o.payment_type_id = pt.id
        GROUP BY pt.name
        ORDER BY total DESC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let total_paid_orders: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = 'Paid'").fetch_one(&mut *conn).await?;

    Ok(ReportSummary { orders_per_coordinator, actions_per_analyst, orders_per_payment_type, total_paid_orders })
}
