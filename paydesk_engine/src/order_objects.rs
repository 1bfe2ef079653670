use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db_types::{Money, OrderStatus};

/// Query-string filters arrive as strings, and clients spell "no filter" three ways: leave the
/// parameter out, send it empty, or send the literal `all`. All three map to `None`.
fn empty_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref() {
        None | Some("") | Some("all") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

//--------------------------------------     OrderUpdate     ---------------------------------------------------------
/// The mutable fields of an order, as supplied by an Edit request. All five are required:
/// an edit replaces the reviewable content of the order wholesale, which is also why it
/// force-resets the status to `Created`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub amount: Money,
    pub currency_id: i64,
    pub payment_type_id: i64,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
}

//--------------------------------------   Query filters     ---------------------------------------------------------
/// Filters for a coordinator's own order list. `None` means "no filter".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoordinatorOrderQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub payment_type: Option<i64>,
}

impl CoordinatorOrderQuery {
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_payment_type(mut self, payment_type_id: i64) -> Self {
        self.payment_type = Some(payment_type_id);
        self
    }
}

/// Filters for the analyst's review queue. The search term matches the creditor name or the
/// coordinator's first or last name, case-insensitively; an empty term matches everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SentOrderQuery {
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub urgent: Option<bool>,
}

impl SentOrderQuery {
    pub fn with_search<S: Into<String>>(mut self, term: S) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn urgent_only(mut self) -> Self {
        self.urgent = Some(true);
        self
    }

    pub fn non_urgent_only(mut self) -> Self {
        self.urgent = Some(false);
        self
    }
}

/// Filters for the full order history. Same search semantics as [`SentOrderQuery`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<OrderStatus>,
}

impl HistoryQuery {
    pub fn with_search<S: Into<String>>(mut self, term: S) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }
}

//--------------------------------------    Projections      ---------------------------------------------------------
/// Slim row for a coordinator's own list view, with the currency code and payment-type name
/// resolved for display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoordinatorOrderSummary {
    pub id: i64,
    pub amount: Money,
    pub urgent: bool,
    pub status: OrderStatus,
    pub paid_on: Option<NaiveDate>,
    pub currency_code: String,
    pub payment_type: String,
}

/// A full order row joined with its currency code and owning coordinator's name, as served to
/// the review queue and the history view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderWithContext {
    pub id: i64,
    pub amount: Money,
    pub currency_id: i64,
    pub payment_type_id: i64,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub urgent: bool,
    pub tax: Money,
    pub discount: Money,
    pub creditor: Option<String>,
    pub offset_document: Option<String>,
    pub status: OrderStatus,
    pub paid_on: Option<NaiveDate>,
    pub coordinator_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub currency_code: String,
    pub coordinator_first_name: String,
    pub coordinator_last_name: String,
}
