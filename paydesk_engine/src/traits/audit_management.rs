use crate::{db_types::AuditEntryRow, traits::PaymentOrderError};

/// Read-only access to the audit trail. There is deliberately no way to update or delete an
/// entry; insertion happens exclusively inside the ledger's lifecycle transactions.
#[allow(async_fn_in_trait)]
pub trait AuditManagement: Clone {
    /// Every audit entry, newest first, joined with the acting user's name.
    async fn audit_log(&self) -> Result<Vec<AuditEntryRow>, PaymentOrderError>;
}
