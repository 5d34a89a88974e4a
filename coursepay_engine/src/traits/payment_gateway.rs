use std::collections::HashMap;

use coursepay_common::MinorUnits;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::GatewayOrderId;

pub const DEFAULT_GATEWAY_REASON: &str = "order_creation_failed";
pub const DEFAULT_GATEWAY_MESSAGE: &str = "Unable to initiate payment";

/// A uniform view of any failure reported by (or while talking to) the payment provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Payment gateway error ({reason}): {provider_message}")]
pub struct GatewayError {
    /// Machine-readable failure reason, e.g. `input_validation_failed` or `gateway_unreachable`.
    pub reason: String,
    /// Human-readable message from the provider. Safe to show to end users.
    pub provider_message: String,
}

impl GatewayError {
    /// Builds an error, substituting the generic reason and message where the provider supplied none.
    pub fn new(reason: Option<String>, provider_message: Option<String>) -> Self {
        let reason = reason.filter(|s| !s.trim().is_empty()).unwrap_or_else(|| DEFAULT_GATEWAY_REASON.to_string());
        let provider_message =
            provider_message.filter(|s| !s.trim().is_empty()).unwrap_or_else(|| DEFAULT_GATEWAY_MESSAGE.to_string());
        Self { reason, provider_message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIntent {
    pub amount: MinorUnits,
    pub currency: String,
    pub receipt: String,
    pub notes: HashMap<String, String>,
}

/// The provider's record of a pending payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub intent_id: GatewayOrderId,
    pub amount: MinorUnits,
    pub currency: String,
    pub receipt: String,
    pub status: String,
}

#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// The provider name stored against every order, e.g. `razorpay`.
    fn provider(&self) -> &'static str;

    /// The public credential identifier that the browser checkout widget needs. Never a secret.
    fn public_key_id(&self) -> String;

    /// Creates a single payment intent with the provider. Implementations must not retry.
    async fn create_intent(&self, intent: NewIntent) -> Result<PaymentIntent, GatewayError>;
}
