use crate::{api::report_objects::ReportSummary, traits::PaymentOrderError};

/// Read-side aggregation over the ledger and the audit trail. Recomputed on demand; there is
/// no caching to invalidate.
#[allow(async_fn_in_trait)]
pub trait Reporting: Clone {
    async fn summary(&self) -> Result<ReportSummary, PaymentOrderError>;
}
