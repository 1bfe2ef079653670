use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Neg, Sub},
    str::FromStr,
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

/// The reason recorded for a return when the analyst does not supply one.
pub const DEFAULT_RETURN_REASON: &str = "Sin motivo especificado";

//--------------------------------------       Money         ---------------------------------------------------------
/// A monetary amount in minor units (cents). All arithmetic is integral; the JSON representation
/// is a decimal number of major units, so `50_000` cents travels as `500.0`.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, PartialOrd, Ord)]
#[sqlx(transparent)]
pub struct Money(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a monetary amount: {0}")]
pub struct MoneyConversionError(String);

impl Money {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn from_major(units: i64) -> Self {
        Self(units * 100)
    }
}

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl TryFrom<f64> for Money {
    type Error = MoneyConversionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(MoneyConversionError(format!("{value} is not a finite number")));
        }
        let cents = (value * 100.0).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return Err(MoneyConversionError(format!("{value} is out of range")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(cents as i64))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: serde::Serializer {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: serde::Deserializer<'de> {
        let value = f64::deserialize(deserializer)?;
        Money::try_from(value).map_err(serde::de::Error::custom)
    }
}

//--------------------------------------     OrderStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatus {
    /// The order has been captured by a coordinator but not yet submitted for review.
    Created,
    /// The order has been submitted and is waiting on an analyst.
    Sent,
    /// An analyst sent the order back to its coordinator.
    Returned,
    /// The order has been paid. Terminal for the review workflow.
    Paid,
}

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(String);

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Created => write!(f, "Created"),
            OrderStatus::Sent => write!(f, "Sent"),
            OrderStatus::Returned => write!(f, "Returned"),
            OrderStatus::Paid => write!(f, "Paid"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "Sent" => Ok(Self::Sent),
            "Returned" => Ok(Self::Returned),
            "Paid" => Ok(Self::Paid),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------     AuditAction     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum AuditAction {
    CreateOrder,
    SendOrder,
    ReturnOrder,
    PayOrder,
    EditOrder,
}

impl Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::CreateOrder => write!(f, "CreateOrder"),
            AuditAction::SendOrder => write!(f, "SendOrder"),
            AuditAction::ReturnOrder => write!(f, "ReturnOrder"),
            AuditAction::PayOrder => write!(f, "PayOrder"),
            AuditAction::EditOrder => write!(f, "EditOrder"),
        }
    }
}

impl FromStr for AuditAction {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CreateOrder" => Ok(Self::CreateOrder),
            "SendOrder" => Ok(Self::SendOrder),
            "ReturnOrder" => Ok(Self::ReturnOrder),
            "PayOrder" => Ok(Self::PayOrder),
            "EditOrder" => Ok(Self::EditOrder),
            s => Err(ConversionError(format!("Invalid audit action: {s}"))),
        }
    }
}

//--------------------------------------        Role         ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum Role {
    /// Captures orders and submits them for review.
    Coordinator,
    /// Reviews submitted orders, paying or returning them.
    Analyst,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Coordinator => write!(f, "Coordinator"),
            Role::Analyst => write!(f, "Analyst"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Coordinator" => Ok(Self::Coordinator),
            "Analyst" => Ok(Self::Analyst),
            "Admin" => Ok(Self::Admin),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
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
    /// The date the order was actually paid. Only ever set by the Pay transition.
    pub paid_on: Option<NaiveDate>,
    pub coordinator_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub coordinator_id: i64,
    pub amount: Money,
    pub currency_id: i64,
    pub payment_type_id: i64,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default)]
    pub tax: Money,
    #[serde(default)]
    pub discount: Money,
    #[serde(default)]
    pub creditor: Option<String>,
    /// Reference to an offsetting document, if this order settles against one.
    #[serde(default)]
    pub offset_document: Option<String>,
}

impl NewOrder {
    pub fn new(
        coordinator_id: i64,
        amount: Money,
        currency_id: i64,
        payment_type_id: i64,
        invoice_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            coordinator_id,
            amount,
            currency_id,
            payment_type_id,
            invoice_date,
            due_date,
            urgent: false,
            tax: Money::default(),
            discount: Money::default(),
            creditor: None,
            offset_document: None,
        }
    }

    pub fn urgent(mut self) -> Self {
        self.urgent = true;
        self
    }

    pub fn with_creditor<S: Into<String>>(mut self, creditor: S) -> Self {
        self.creditor = Some(creditor.into());
        self
    }

    pub fn with_tax(mut self, tax: Money) -> Self {
        self.tax = tax;
        self
    }

    pub fn with_discount(mut self, discount: Money) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_offset_document<S: Into<String>>(mut self, doc: S) -> Self {
        self.offset_document = Some(doc.into());
        self
    }
}

//--------------------------------------     OrderReturn     ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderReturn {
    pub id: i64,
    pub order_id: i64,
    pub reason: String,
    pub analyst_id: i64,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------    AuditEntryRow    ---------------------------------------------------------
/// One entry of the audit trail, joined with the acting user's name for display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditEntryRow {
    pub id: i64,
    pub actor_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub action: AuditAction,
    pub details: Option<String>,
    pub order_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      Currency       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Currency {
    pub id: i64,
    pub code: String,
    pub name: String,
    /// Exchange rate relative to the base currency of the external feed.
    pub rate: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCurrency {
    pub code: String,
    pub name: String,
    pub rate: f64,
}

//--------------------------------------     PaymentType     ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentType {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPaymentType {
    pub name: String,
    pub abbreviation: String,
}

//--------------------------------------     ReturnType      ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReturnType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReturnType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

//--------------------------------------        User         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Already hashed by the caller. The engine never sees a clear-text password.
    pub password_hash: String,
    pub role: Role,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn money_display_and_conversion() {
        assert_eq!(format!("{}", Money::from_cents(50_000)), "500.00");
        assert_eq!(format!("{}", Money::from_cents(1)), "0.01");
        assert_eq!(format!("{}", Money::from_cents(-2_530)), "-25.30");
        assert_eq!(Money::try_from(500.0).unwrap(), Money::from_major(500));
        assert_eq!(Money::try_from(0.1).unwrap(), Money::from_cents(10));
        assert!(Money::try_from(f64::NAN).is_err());
        assert!(Money::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn money_json_round_trip() {
        let amount = Money::from_cents(123_45);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "123.45");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn order_status_round_trip() {
        for status in [OrderStatus::Created, OrderStatus::Sent, OrderStatus::Returned, OrderStatus::Paid] {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("Cancelled".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn audit_action_round_trip() {
        for action in [
            AuditAction::CreateOrder,
            AuditAction::SendOrder,
            AuditAction::ReturnOrder,
            AuditAction::PayOrder,
            AuditAction::EditOrder,
        ] {
            assert_eq!(action.to_string().parse::<AuditAction>().unwrap(), action);
        }
    }
}
