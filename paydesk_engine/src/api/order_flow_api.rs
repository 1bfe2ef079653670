use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderReturn, DEFAULT_RETURN_REASON},
    order_objects::{
        CoordinatorOrderQuery,
        CoordinatorOrderSummary,
        HistoryQuery,
        OrderUpdate,
        OrderWithContext,
        SentOrderQuery,
    },
    traits::{OrderLedger, PaymentOrderError},
};

/// `OrderFlowApi` is the primary API for moving payment orders through their lifecycle:
/// capture, submission, review, return and payment. Every mutating call is atomic with its
/// audit-log entry; the backend guarantees it.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderLedger
{
    /// Captures a brand-new order. The order starts in `Created` status and must be sent for
    /// review before an analyst can act on it.
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, PaymentOrderError> {
        let order = self.db.create_order(order).await?;
        debug!("🔄️📦️ Order #{} captured for coordinator {}", order.id, order.coordinator_id);
        Ok(order)
    }

    /// Submits the order to the analysts' review queue. Legal from `Created`, and from
    /// `Returned` when a coordinator resubmits without editing.
    pub async fn send_order(&self, order_id: i64, actor_id: i64) -> Result<Order, PaymentOrderError> {
        let order = self.db.send_order(order_id, actor_id).await?;
        debug!("🔄️📦️ Order #{order_id} moved to the review queue");
        Ok(order)
    }

    /// Sends the order back to its coordinator. An empty or missing reason is recorded with the
    /// stock placeholder so the return record is never blank.
    pub async fn return_order(
        &self,
        order_id: i64,
        analyst_id: i64,
        reason: Option<&str>,
    ) -> Result<Order, PaymentOrderError> {
        let reason = reason.filter(|r| !r.trim().is_empty()).unwrap_or(DEFAULT_RETURN_REASON);
        let order = self.db.return_order(order_id, analyst_id, reason).await?;
        debug!("🔄️📦️ Order #{order_id} returned to coordinator {}", order.coordinator_id);
        Ok(order)
    }

    /// Marks the order as paid, stamping the real payment date. `Paid` is terminal; paying
    /// again is an invalid transition rather than a silent re-stamp.
    pub async fn pay_order(&self, order_id: i64, analyst_id: i64) -> Result<Order, PaymentOrderError> {
        let order = self.db.pay_order(order_id, analyst_id).await?;
        debug!("🔄️📦️ Order #{order_id} paid on {:?}", order.paid_on);
        Ok(order)
    }

    /// Replaces the order's reviewable fields and resets it to `Created`. This is the
    /// coordinator's path back into the workflow after a return, and it deliberately applies
    /// from any status.
    pub async fn edit_order(
        &self,
        order_id: i64,
        coordinator_id: i64,
        update: &OrderUpdate,
    ) -> Result<Order, PaymentOrderError> {
        let order = self.db.edit_order(order_id, coordinator_id, update).await?;
        debug!("🔄️📦️ Order #{order_id} edited; back to Created");
        Ok(order)
    }

    pub async fn fetch_order(&self, order_id: i64) -> Result<Order, PaymentOrderError> {
        self.db.fetch_order(order_id).await?.ok_or(PaymentOrderError::OrderNotFound(order_id))
    }

    pub async fn returns_for_order(&self, order_id: i64) -> Result<Vec<OrderReturn>, PaymentOrderError> {
        self.db.returns_for_order(order_id).await
    }

    pub async fn orders_for_coordinator(
        &self,
        coordinator_id: i64,
        query: &CoordinatorOrderQuery,
    ) -> Result<Vec<CoordinatorOrderSummary>, PaymentOrderError> {
        self.db.orders_for_coordinator(coordinator_id, query).await
    }

    pub async fn sent_orders(&self, query: &SentOrderQuery) -> Result<Vec<OrderWithContext>, PaymentOrderError> {
        self.db.sent_orders(query).await
    }

    pub async fn order_history(&self, query: &HistoryQuery) -> Result<Vec<OrderWithContext>, PaymentOrderError> {
        self.db.order_history(query).await
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
