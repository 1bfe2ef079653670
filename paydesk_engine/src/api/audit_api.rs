use std::fmt::Debug;

use crate::{
    db_types::AuditEntryRow,
    traits::{AuditManagement, PaymentOrderError},
};

/// Read-only view over the audit trail.
pub struct AuditApi<B> {
    db: B,
}

impl<B> Debug for AuditApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuditApi")
    }
}

impl<B> AuditApi<B>
where B: AuditManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn list_entries(&self) -> Result<Vec<AuditEntryRow>, PaymentOrderError> {
        self.db.audit_log().await
    }
}
