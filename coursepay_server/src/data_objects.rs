use std::fmt::Display;

use chrono::{DateTime, Utc};
use coursepay_common::MinorUnits;
use coursepay_engine::{
    db_types::{Order, OrderStatusType},
    notifications::EmailOutcome,
    order_objects::{CourseSummary, CreatedOrder, Purchase, VerifiedPayment, VerifyPaymentRequest},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

//-------------------------------------------   Requests  ------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderParams {
    #[serde(default)]
    pub course_id: String,
}

/// The fields the Razorpay checkout widget hands back to the browser after a payment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentParams {
    #[serde(default)]
    pub razorpay_order_id: String,
    #[serde(default)]
    pub razorpay_payment_id: String,
    #[serde(default)]
    pub razorpay_signature: String,
}

impl From<VerifyPaymentParams> for VerifyPaymentRequest {
    fn from(value: VerifyPaymentParams) -> Self {
        VerifyPaymentRequest::new(value.razorpay_order_id, value.razorpay_payment_id, value.razorpay_signature)
    }
}

//-------------------------------------------   Responses  -----------------------------------------------------
/// The order as clients see it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: i64,
    pub course_id: String,
    pub provider: String,
    pub amount: MinorUnits,
    pub currency: String,
    pub status: OrderStatusType,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            course_id: order.course_id,
            provider: order.provider,
            amount: order.amount,
            currency: order.currency,
            status: order.status,
            razorpay_order_id: order.gateway_order_id.0,
            razorpay_payment_id: order.gateway_payment_id,
            verified_at: order.verified_at,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutCredentials {
    pub key_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrderView {
    pub id: String,
    pub amount: MinorUnits,
    pub currency: String,
    pub receipt: String,
    pub status: String,
}

/// Everything the browser needs to open the checkout widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDetails {
    pub provider: String,
    pub credentials: CheckoutCredentials,
    pub order: GatewayOrderView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub message: String,
    pub order: OrderView,
    pub course: CourseSummary,
    pub payment: CheckoutDetails,
}

impl From<CreatedOrder> for CreateOrderResponse {
    fn from(created: CreatedOrder) -> Self {
        let CreatedOrder { order, course, intent, key_id } = created;
        let payment = CheckoutDetails {
            provider: order.provider.clone(),
            credentials: CheckoutCredentials { key_id },
            order: GatewayOrderView {
                id: intent.intent_id.0,
                amount: intent.amount,
                currency: intent.currency,
                receipt: intent.receipt,
                status: intent.status,
            },
        };
        Self { message: "Order created".to_string(), order: order.into(), course, payment }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub message: String,
    pub already_verified: bool,
    pub order: OrderView,
    pub course: Option<CourseSummary>,
    pub email: EmailOutcome,
}

impl From<VerifiedPayment> for VerifyPaymentResponse {
    fn from(verified: VerifiedPayment) -> Self {
        let message = if verified.already_verified { "Payment already verified" } else { "Payment verified" };
        Self {
            message: message.to_string(),
            already_verified: verified.already_verified,
            order: verified.order.into(),
            course: verified.course,
            email: verified.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseView {
    #[serde(flatten)]
    pub order: OrderView,
    pub course: Option<CourseSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasesResponse {
    pub message: String,
    pub orders: Vec<PurchaseView>,
}

impl From<Vec<Purchase>> for PurchasesResponse {
    fn from(purchases: Vec<Purchase>) -> Self {
        let orders = purchases
            .into_iter()
            .map(|p| PurchaseView { order: p.order.into(), course: p.course })
            .collect::<Vec<_>>();
        Self { message: format!("{} purchased course(s)", orders.len()), orders }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub processed: bool,
    pub message: String,
}
