use std::{collections::HashMap, fmt::Debug};

use log::*;

use crate::{
    db_types::{Currency, NewCurrency, NewPaymentType, NewReturnType, PaymentType, ReturnType},
    traits::{CatalogError, CatalogManagement},
};

/// CRUD over the reference catalogs, plus the bulk exchange-rate refresh.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn currencies(&self) -> Result<Vec<Currency>, CatalogError> {
        self.db.currencies().await
    }

    pub async fn add_currency(&self, currency: &NewCurrency) -> Result<Currency, CatalogError> {
        self.db.add_currency(currency).await
    }

    pub async fn update_currency(&self, id: i64, currency: &NewCurrency) -> Result<Currency, CatalogError> {
        self.db.update_currency(id, currency).await
    }

    pub async fn delete_currency(&self, id: i64) -> Result<(), CatalogError> {
        self.db.delete_currency(id).await
    }

    pub async fn payment_types(&self) -> Result<Vec<PaymentType>, CatalogError> {
        self.db.payment_types().await
    }

    pub async fn add_payment_type(&self, payment_type: &NewPaymentType) -> Result<PaymentType, CatalogError> {
        self.db.add_payment_type(payment_type).await
    }

    pub async fn update_payment_type(&self, id: i64, payment_type: &NewPaymentType) -> Result<PaymentType, CatalogError> {
        self.db.update_payment_type(id, payment_type).await
    }

    pub async fn delete_payment_type(&self, id: i64) -> Result<(), CatalogError> {
        self.db.delete_payment_type(id).await
    }

    pub async fn return_types(&self) -> Result<Vec<ReturnType>, CatalogError> {
        self.db.return_types().await
    }

    pub async fn add_return_type(&self, return_type: &NewReturnType) -> Result<ReturnType, CatalogError> {
        self.db.add_return_type(return_type).await
    }

    pub async fn update_return_type(&self, id: i64, return_type: &NewReturnType) -> Result<ReturnType, CatalogError> {
        self.db.update_return_type(id, return_type).await
    }

    pub async fn delete_return_type(&self, id: i64) -> Result<(), CatalogError> {
        self.db.delete_return_type(id).await
    }

    /// Applies an external rate sheet to the currency catalog. Only currencies whose code
    /// appears in the sheet are touched; the rest keep their last known rate.
    pub async fn apply_rate_sheet(&self, rates: &HashMap<String, f64>) -> Result<u64, CatalogError> {
        let updated = self.db.apply_rate_sheet(rates).await?;
        info!("💱️ Exchange rates refreshed for {updated} of {} codes in the sheet", rates.len());
        Ok(updated)
    }
}
