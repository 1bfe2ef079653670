//! `SqliteDatabase` is the concrete storage backend for the PayDesk engine.
//!
//! Unsurprisingly, it uses SQLite and implements all the traits defined in the [`crate::traits`]
//! module. Every lifecycle method runs its order mutation and its audit insert inside a single
//! transaction; an error on any step before the commit rolls the whole operation back.
use std::{collections::HashMap, fmt::Debug};

use chrono::Utc;
use log::*;
use sqlx::SqlitePool;

use super::db::{audit, catalogs, db_url, new_pool, orders, reports, returns, users};
use crate::{
    api::report_objects::ReportSummary,
    db_types::{
        AuditAction,
        AuditEntryRow,
        Currency,
        NewCurrency,
        NewOrder,
        NewPaymentType,
        NewReturnType,
        NewUser,
        Order,
        OrderReturn,
        OrderStatus,
        PaymentType,
        ReturnType,
        User,
    },
    order_objects::{
        CoordinatorOrderQuery,
        CoordinatorOrderSummary,
        HistoryQuery,
        OrderUpdate,
        OrderWithContext,
        SentOrderQuery,
    },
    traits::{
        AuditManagement,
        AuthApiError,
        CatalogError,
        CatalogManagement,
        OrderLedger,
        PaymentOrderError,
        Reporting,
        UserManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the environment, or the default.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date, creating it from scratch on a fresh database.
    pub async fn run_migrations(&self) -> Result<(), PaymentOrderError> {
        sqlx::migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| PaymentOrderError::DatabaseError(e.to_string()))?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl OrderLedger for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, PaymentOrderError> {
        let coordinator_id = order.coordinator_id;
        let amount = order.amount;
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        audit::insert_entry(
            coordinator_id,
            AuditAction::CreateOrder,
            Some(format!("Order created with amount {amount}")),
            Some(order.id),
            &mut tx,
        )
        .await?;
        tx.commit().await?;
        debug!("🗃️ Order #{} created by coordinator {coordinator_id}", order.id);
        Ok(order)
    }

    async fn send_order(&self, order_id: i64, actor_id: i64) -> Result<Order, PaymentOrderError> {
        let mut tx = self.pool.begin().await?;
        let order =
            orders::fetch_order(order_id, &mut tx).await?.ok_or(PaymentOrderError::OrderNotFound(order_id))?;
        if !matches!(order.status, OrderStatus::Created | OrderStatus::Returned) {
            return Err(PaymentOrderError::InvalidTransition { from: order.status, to: OrderStatus::Sent });
        }
        let order = orders::update_status(order_id, OrderStatus::Sent, &mut tx).await?;
        audit::insert_entry(actor_id, AuditAction::SendOrder, None, Some(order_id), &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order #{order_id} submitted for review by user {actor_id}");
        Ok(order)
    }

    async fn return_order(&self, order_id: i64, analyst_id: i64, reason: &str) -> Result<Order, PaymentOrderError> {
        let mut tx = self.pool.begin().await?;
        let order =
            orders::fetch_order(order_id, &mut tx).await?.ok_or(PaymentOrderError::OrderNotFound(order_id))?;
        if order.status != OrderStatus::Sent {
            return Err(PaymentOrderError::InvalidTransition { from: order.status, to: OrderStatus::Returned });
        }
        let order = orders::update_status(order_id, OrderStatus::Returned, &mut tx).await?;
        returns::insert_return(order_id, reason, analyst_id, &mut tx).await?;
        audit::insert_entry(
            analyst_id,
            AuditAction::ReturnOrder,
            Some(format!("Reason: {reason}")),
            Some(order_id),
            &mut tx,
        )
        .await?;
        tx.commit().await?;
        debug!("🗃️ Order #{order_id} returned by analyst {analyst_id}");
        Ok(order)
    }

    async fn pay_order(&self, order_id: i64, analyst_id: i64) -> Result<Order, PaymentOrderError> {
        let mut tx = self.pool.begin().await?;
        let order =
            orders::fetch_order(order_id, &mut tx).await?.ok_or(PaymentOrderError::OrderNotFound(order_id))?;
        if order.status != OrderStatus::Sent {
            return Err(PaymentOrderError::InvalidTransition { from: order.status, to: OrderStatus::Paid });
        }
        let order = orders::mark_paid(order_id, Utc::now().date_naive(), &mut tx).await?;
        audit::insert_entry(analyst_id, AuditAction::PayOrder, None, Some(order_id), &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order #{order_id} paid by analyst {analyst_id}");
        Ok(order)
    }

    async fn edit_order(
        &self,
        order_id: i64,
        coordinator_id: i64,
        update: &OrderUpdate,
    ) -> Result<Order, PaymentOrderError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::update_order(order_id, update, &mut tx)
            .await?
            .ok_or(PaymentOrderError::OrderNotFound(order_id))?;
        audit::insert_entry(
            coordinator_id,
            AuditAction::EditOrder,
            Some("Coordinator modified the order".to_string()),
            Some(order_id),
            &mut tx,
        )
        .await?;
        tx.commit().await?;
        debug!("🗃️ Order #{order_id} edited by coordinator {coordinator_id}; status reset to Created");
        Ok(order)
    }

    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, PaymentOrderError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn returns_for_order(&self, order_id: i64) -> Result<Vec<OrderReturn>, PaymentOrderError> {
        let mut conn = self.pool.acquire().await?;
        let records = returns::returns_for_order(order_id, &mut conn).await?;
        Ok(records)
    }

    async fn orders_for_coordinator(
        &self,
        coordinator_id: i64,
        query: &CoordinatorOrderQuery,
    ) -> Result<Vec<CoordinatorOrderSummary>, PaymentOrderError> {
        let mut conn = self.pool.acquire().await?;
        let rows = orders::orders_for_coordinator(coordinator_id, query, &mut conn).await?;
        Ok(rows)
    }

    async fn sent_orders(&self, query: &SentOrderQuery) -> Result<Vec<OrderWithContext>, PaymentOrderError> {
        let mut conn = self.pool.acquire().await?;
        let rows = orders::sent_orders(query, &mut conn).await?;
        Ok(rows)
    }

    async fn order_history(&self, query: &HistoryQuery) -> Result<Vec<OrderWithContext>, PaymentOrderError> {
        let mut conn = self.pool.acquire().await?;
        let rows = orders::order_history(query, &mut conn).await?;
        Ok(rows)
    }

    async fn close(&mut self) -> Result<(), PaymentOrderError> {
        self.pool.close().await;
        Ok(())
    }
}

impl AuditManagement for SqliteDatabase {
    async fn audit_log(&self) -> Result<Vec<AuditEntryRow>, PaymentOrderError> {
        let mut conn = self.pool.acquire().await?;
        let entries = audit::list_entries(&mut conn).await?;
        Ok(entries)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn currencies(&self) -> Result<Vec<Currency>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let rows = catalogs::currencies(&mut conn).await?;
        Ok(rows)
    }

    async fn add_currency(&self, currency: &NewCurrency) -> Result<Currency, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalogs::insert_currency(currency, &mut conn).await
    }

    async fn update_currency(&self, id: i64, currency: &NewCurrency) -> Result<Currency, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalogs::update_currency(id, currency, &mut conn).await
    }

    async fn delete_currency(&self, id: i64) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalogs::delete_currency(id, &mut conn).await
    }

    async fn payment_types(&self) -> Result<Vec<PaymentType>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let rows = catalogs::payment_types(&mut conn).await?;
        Ok(rows)
    }

    async fn add_payment_type(&self, payment_type: &NewPaymentType) -> Result<PaymentType, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalogs::insert_payment_type(payment_type, &mut conn).await
    }

    async fn update_payment_type(&self, id: i64, payment_type: &NewPaymentType) -> Result<PaymentType, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalogs::update_payment_type(id, payment_type, &mut conn).await
    }

    async fn delete_payment_type(&self, id: i64) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalogs::delete_payment_type(id, &mut conn).await
    }

    async fn return_types(&self) -> Result<Vec<ReturnType>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let rows = catalogs::return_types(&mut conn).await?;
        Ok(rows)
    }

    async fn add_return_type(&self, return_type: &NewReturnType) -> Result<ReturnType, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalogs::insert_return_type(return_type, &mut conn).await
    }

    async fn update_return_type(&self, id: i64, return_type: &NewReturnType) -> Result<ReturnType, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalogs::update_return_type(id, return_type, &mut conn).await
    }

    async fn delete_return_type(&self, id: i64) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalogs::delete_return_type(id, &mut conn).await
    }

    async fn apply_rate_sheet(&self, rates: &HashMap<String, f64>) -> Result<u64, CatalogError> {
        let mut tx = self.pool.begin().await?;
        let updated = catalogs::apply_rate_sheet(rates, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Exchange rates refreshed for {updated} currencies");
        Ok(updated)
    }
}

impl UserManagement for SqliteDatabase {
    async fn register_user(&self, user: &NewUser) -> Result<User, AuthApiError> {
        let mut conn = self.pool.acquire().await.map_err(|e| AuthApiError::DatabaseError(e.to_string()))?;
        let user = users::insert_user(user, &mut conn).await?;
        debug!("🗃️ User #{} registered with role {}", user.id, user.role);
        Ok(user)
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError> {
        let mut conn = self.pool.acquire().await.map_err(|e| AuthApiError::DatabaseError(e.to_string()))?;
        let user = users::fetch_user_by_email(email, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_user(&self, id: i64) -> Result<Option<User>, AuthApiError> {
        let mut conn = self.pool.acquire().await.map_err(|e| AuthApiError::DatabaseError(e.to_string()))?;
        let user = users::fetch_user(id, &mut conn).await?;
        Ok(user)
    }
}

impl Reporting for SqliteDatabase {
    async fn summary(&self) -> Result<ReportSummary, PaymentOrderError> {
        let mut tx = self.pool.begin().await?;
        let summary = reports::summary(&mut tx).await?;
        tx.commit().await?;
        Ok(summary)
    }
}
