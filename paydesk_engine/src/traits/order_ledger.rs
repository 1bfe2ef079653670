use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderReturn, OrderStatus},
    order_objects::{CoordinatorOrderQuery, CoordinatorOrderSummary, HistoryQuery, OrderUpdate, OrderWithContext, SentOrderQuery},
};

/// The order ledger is the durable record of payment orders and the only place their state may
/// change. Every mutating call performs its state change and its audit-log insertion inside one
/// transaction: either both persist or neither does.
#[allow(async_fn_in_trait)]
pub trait OrderLedger: Clone {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Stores a brand-new order in `Created` status and audits the creation. Returns the full
    /// stored record.
    async fn create_order(&self, order: NewOrder) -> Result<Order, PaymentOrderError>;

    /// Moves an order to `Sent`. Legal from `Created` and from `Returned` (resubmission);
    /// anything else is an [`PaymentOrderError::InvalidTransition`].
    async fn send_order(&self, order_id: i64, actor_id: i64) -> Result<Order, PaymentOrderError>;

    /// Moves a `Sent` order to `Returned`, files an [`OrderReturn`] record carrying the reason,
    /// and audits the return.
    async fn return_order(&self, order_id: i64, analyst_id: i64, reason: &str) -> Result<Order, PaymentOrderError>;

    /// Moves a `Sent` order to `Paid`, stamping `paid_on` with the current date. `Paid` is
    /// terminal: paying twice is rejected rather than re-stamped.
    async fn pay_order(&self, order_id: i64, analyst_id: i64) -> Result<Order, PaymentOrderError>;

    /// Overwrites the order's reviewable fields and force-resets its status to `Created`,
    /// whatever it was before. The edit is audited against the given coordinator.
    async fn edit_order(
        &self,
        order_id: i64,
        coordinator_id: i64,
        update: &OrderUpdate,
    ) -> Result<Order, PaymentOrderError>;

    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, PaymentOrderError>;

    /// All return records filed against the order, oldest first.
    async fn returns_for_order(&self, order_id: i64) -> Result<Vec<OrderReturn>, PaymentOrderError>;

    /// A coordinator's own orders, newest-created-first.
    async fn orders_for_coordinator(
        &self,
        coordinator_id: i64,
        query: &CoordinatorOrderQuery,
    ) -> Result<Vec<CoordinatorOrderSummary>, PaymentOrderError>;

    /// The review queue: orders in `Sent` status only, urgent-first then earliest due date
    /// first.
    async fn sent_orders(&self, query: &SentOrderQuery) -> Result<Vec<OrderWithContext>, PaymentOrderError>;

    /// Every order regardless of status, newest-id-first.
    async fn order_history(&self, query: &HistoryQuery) -> Result<Vec<OrderWithContext>, PaymentOrderError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), PaymentOrderError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum PaymentOrderError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(i64),
    #[error("An order in status {from} cannot move to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("The operation violates referential integrity: {0}")]
    IntegrityViolation(String),
}

impl From<sqlx::Error> for PaymentOrderError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_foreign_key_violation() {
                return PaymentOrderError::IntegrityViolation(db.message().to_string());
            }
        }
        PaymentOrderError::DatabaseError(e.to_string())
    }
}
