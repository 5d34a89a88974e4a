use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use coursepay_common::MinorUnits;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row, Type};
use thiserror::Error;

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// A payment intent has been created with the gateway, but no verified outcome has been recorded yet.
    Pending,
    /// The payment has been verified. Terminal.
    Paid,
    /// The payment failed, was cancelled, or could not be verified. Terminal.
    Failed,
}

impl OrderStatusType {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatusType::Pending)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Paid => write!(f, "paid"),
            OrderStatusType::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct OrderStatusConversionError(pub String);

impl FromStr for OrderStatusType {
    type Err = OrderStatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            s => Err(OrderStatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------   GatewayOrderId      ---------------------------------------------------------
/// The identifier the payment gateway assigned to the payment intent (e.g. `order_IluGWxBm9U8zJ8`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct GatewayOrderId(pub String);

impl GatewayOrderId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for GatewayOrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: Into<String>> From<S> for GatewayOrderId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: String,
    pub course_id: String,
    pub provider: String,
    pub amount: MinorUnits,
    pub currency: String,
    pub receipt: String,
    pub gateway_order_id: GatewayOrderId,
    pub gateway_payment_id: Option<String>,
    /// Kept for auditing. Never sent to clients.
    #[serde(skip_serializing, default)]
    pub signature: Option<String>,
    pub status: OrderStatusType,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

//--------------------------------------       NewOrder        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: String,
    pub course_id: String,
    pub provider: String,
    pub amount: MinorUnits,
    pub currency: String,
    pub receipt: String,
    pub gateway_order_id: GatewayOrderId,
}

//--------------------------------------   OrderTransition     ---------------------------------------------------------
/// The fields written when a pending order moves to a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTransition {
    pub status: OrderStatusType,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl OrderTransition {
    pub fn paid(payment_id: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            status: OrderStatusType::Paid,
            payment_id: Some(payment_id.into()),
            signature: Some(signature.into()),
            verified_at: Some(Utc::now()),
        }
    }

    pub fn failed(payment_id: Option<String>) -> Self {
        Self { status: OrderStatusType::Failed, payment_id, signature: None, verified_at: None }
    }
}

//--------------------------------------        Course         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Price in major units of the store currency.
    pub price: Decimal,
}

// Prices are stored as decimal text, so that sqlite never turns them into floats.
impl<'r> FromRow<'r, SqliteRow> for Course {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let price: String = row.try_get("price")?;
        let price = Decimal::from_str(price.trim()).map_err(|e| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(e),
        })?;
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            price,
        })
    }
}

//--------------------------------------         User          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}
