use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Course, Order},
    notifications::EmailOutcome,
    traits::PaymentIntent,
};

/// The public fields of a course, as returned alongside orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    pub price: Decimal,
}

impl From<Course> for CourseSummary {
    fn from(course: Course) -> Self {
        Self { id: course.id, title: course.title, category: course.category, price: course.price }
    }
}

/// The result of a successful order creation. Everything the browser needs to open the checkout widget.
#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order: Order,
    pub course: CourseSummary,
    pub intent: PaymentIntent,
    /// The gateway's public key id.
    pub key_id: String,
}

/// The fields the checkout widget hands back to the browser after a payment attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub gateway_order_id: String,
    pub payment_id: String,
    pub signature: String,
}

impl VerifyPaymentRequest {
    pub fn new(gateway_order_id: impl Into<String>, payment_id: impl Into<String>, signature: impl Into<String>) -> Self {
        Self { gateway_order_id: gateway_order_id.into(), payment_id: payment_id.into(), signature: signature.into() }
    }

    /// Names of the fields that are missing or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.gateway_order_id.trim().is_empty() {
            missing.push("order id");
        }
        if self.payment_id.trim().is_empty() {
            missing.push("payment id");
        }
        if self.signature.trim().is_empty() {
            missing.push("signature");
        }
        missing
    }
}

#[derive(Debug, Clone)]
pub struct VerifiedPayment {
    pub order: Order,
    pub course: Option<CourseSummary>,
    pub email: EmailOutcome,
    /// True when the order was already paid before this call, either from an earlier call or via the webhook.
    pub already_verified: bool,
}

/// Why a webhook notification did not change anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotProcessedReason {
    MalformedPayload,
    UnknownOrder,
    NoStateChange,
}

impl Display for NotProcessedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedPayload => write!(f, "No payment entity in webhook payload"),
            Self::UnknownOrder => write!(f, "Order not found for webhook"),
            Self::NoStateChange => write!(f, "Order status unchanged"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The notification moved the order to a terminal state.
    Applied(Order),
    NotProcessed(NotProcessedReason),
}

impl WebhookOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, WebhookOutcome::Applied(_))
    }
}

/// A completed purchase, as listed on the user's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub order: Order,
    pub course: Option<CourseSummary>,
}
