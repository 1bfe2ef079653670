use std::collections::HashMap;

use thiserror::Error;

use crate::db_types::{Currency, NewCurrency, NewPaymentType, NewReturnType, PaymentType, ReturnType};

/// CRUD over the reference catalogs: currencies, payment types and return types.
///
/// Payment types carry the only referential-integrity protection: deleting one that is still
/// referenced by an order fails with [`CatalogError::EntryInUse`]. Currencies and return types
/// delete unconditionally.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement: Clone {
    async fn currencies(&self) -> Result<Vec<Currency>, CatalogError>;
    async fn add_currency(&self, currency: &NewCurrency) -> Result<Currency, CatalogError>;
    async fn update_currency(&self, id: i64, currency: &NewCurrency) -> Result<Currency, CatalogError>;
    async fn delete_currency(&self, id: i64) -> Result<(), CatalogError>;

    async fn payment_types(&self) -> Result<Vec<PaymentType>, CatalogError>;
    async fn add_payment_type(&self, payment_type: &NewPaymentType) -> Result<PaymentType, CatalogError>;
    async fn update_payment_type(&self, id: i64, payment_type: &NewPaymentType) -> Result<PaymentType, CatalogError>;
    async fn delete_payment_type(&self, id: i64) -> Result<(), CatalogError>;

    async fn return_types(&self) -> Result<Vec<ReturnType>, CatalogError>;
    async fn add_return_type(&self, return_type: &NewReturnType) -> Result<ReturnType, CatalogError>;
    async fn update_return_type(&self, id: i64, return_type: &NewReturnType) -> Result<ReturnType, CatalogError>;
    async fn delete_return_type(&self, id: i64) -> Result<(), CatalogError>;

    /// Overwrites the rate and timestamp of every local currency whose code appears in the
    /// sheet, in one transaction. Codes with no local counterpart are ignored. Returns the
    /// number of currencies updated.
    async fn apply_rate_sheet(&self, rates: &HashMap<String, f64>) -> Result<u64, CatalogError>;
}

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("A catalog entry with the same unique value already exists: {0}")]
    DuplicateEntry(String),
    #[error("The catalog entry is referenced by existing orders: {0}")]
    EntryInUse(String),
    #[error("The requested catalog entry {0} does not exist")]
    EntryNotFound(i64),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return CatalogError::DuplicateEntry(db.message().to_string());
            }
            if db.is_foreign_key_violation() {
                return CatalogError::EntryInUse(db.message().to_string());
            }
        }
        CatalogError::DatabaseError(e.to_string())
    }
}
