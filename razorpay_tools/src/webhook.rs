use serde::Deserialize;

use crate::RazorpayApiError;

/// Razorpay signs the raw webhook body with the webhook secret and puts the hex digest in this header.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

/// A webhook notification. Only payment events carry the fields the reconciler needs; everything else is parsed
/// leniently so that unrelated events do not show up as malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub payment: Option<PaymentWrapper>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentWrapper {
    pub entity: PaymentEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEntity {
    pub id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl WebhookEvent {
    pub fn from_slice(body: &[u8]) -> Result<Self, RazorpayApiError> {
        serde_json::from_slice(body).map_err(|e| RazorpayApiError::JsonError(e.to_string()))
    }

    /// The payment entity, provided it names both a payment and the gateway order it belongs to.
    pub fn payment_entity(&self) -> Option<&PaymentEntity> {
        self.payload
            .payment
            .as_ref()
            .map(|p| &p.entity)
            .filter(|e| !e.id.is_empty() && e.order_id.as_deref().is_some_and(|id| !id.is_empty()))
    }
}
