use sqlx::SqliteConnection;

use crate::{
    db_types::{AuditAction, AuditEntryRow},
    traits::PaymentOrderError,
};

/// Appends one entry to the audit trail. Always call this inside the same transaction as the
/// state change it records; the trail has no value if it can drift from the ledger.
pub(crate) async fn insert_entry(
    actor_id: i64,
    action: AuditAction,
    details: Option<String>,
    order_id: Option<i64>,
    conn: &mut SqliteConnection,
) -> Result<(), PaymentOrderError> {
    sqlx::query("INSERT INTO audit_log (actor_id, action, details, order_id) VALUES ($1, $2, $3, $4)")
        .bind(actor_id)
        .bind(action.to_string())
        .bind(details)
        .bind(order_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Every entry, newest first. Ties on the one-second timestamp resolution are broken by the
/// assigned id, so entries created in the same second still list in insertion order.
pub(crate) async fn list_entries(conn: &mut SqliteConnection) -> Result<Vec<AuditEntryRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            b.id,
            b.actor_id,
            u.first_name,
            u.last_name,
            b.action,
            b.details,
            b.order_id,
            b.created_at
        FROM audit_log b
        JOIN users u ON b.actor_id = u.id
        ORDER BY b.created_at DESC, b.id DESC
        "#,
    )
    .fetch_all(&mut *conn)
    .await
}
