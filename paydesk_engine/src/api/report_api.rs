use std::fmt::Debug;

use crate::{
    api::report_objects::ReportSummary,
    traits::{PaymentOrderError, Reporting},
};

/// On-demand management summaries over the ledger and the audit trail.
pub struct ReportApi<B> {
    db: B,
}

impl<B> Debug for ReportApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReportApi")
    }
}

impl<B> ReportApi<B>
where B: Reporting
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn summary(&self) -> Result<ReportSummary, PaymentOrderError> {
        self.db.summary().await
    }
}
