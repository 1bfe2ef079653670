use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoordinatorOrderCount {
    pub coordinator: String,
    pub total_orders: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnalystActionCount {
    pub analyst: String,
    /// Pay and Return actions only; the other audit actions are coordinator work.
    pub total_actions: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentTypeCount {
    pub payment_type: String,
    pub total: i64,
}

/// The full management summary, recomputed from the ledger on every request.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub orders_per_coordinator: Vec<CoordinatorOrderCount>,
    pub actions_per_analyst: Vec<AnalystActionCount>,
    pub orders_per_payment_type: Vec<PaymentTypeCount>,
    pub total_paid_orders: i64,
}
