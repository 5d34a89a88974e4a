use coursepay_common::MinorUnits;
use coursepay_engine::traits::{GatewayError, NewIntent, PaymentGateway, PaymentIntent};
use log::*;
use razorpay_tools::{NewRazorpayOrder, RazorpayApi, RazorpayApiError};

pub const RAZORPAY_PROVIDER: &str = "razorpay";

/// [`PaymentGateway`] backed by the Razorpay Orders API.
#[derive(Clone)]
pub struct RazorpayGateway {
    api: RazorpayApi,
}

impl RazorpayGateway {
    pub fn new(api: RazorpayApi) -> Self {
        Self { api }
    }
}

/// Folds a Razorpay client failure into the engine's uniform gateway error.
pub fn to_gateway_error(e: &RazorpayApiError) -> GatewayError {
    GatewayError::new(Some(e.reason()), e.provider_message())
}

impl PaymentGateway for RazorpayGateway {
    fn provider(&self) -> &'static str {
        RAZORPAY_PROVIDER
    }

    fn public_key_id(&self) -> String {
        self.api.config().key_id.clone()
    }

    async fn create_intent(&self, intent: NewIntent) -> Result<PaymentIntent, GatewayError> {
        let NewIntent { amount, currency, receipt, notes } = intent;
        let order = NewRazorpayOrder { amount: amount.value(), currency, receipt: receipt.clone(), notes };
        let created = self.api.create_order(order).await.map_err(|e| {
            warn!("💻️ Razorpay did not create an order for receipt {receipt}. {e}");
            to_gateway_error(&e)
        })?;
        if created.amount != amount.value() {
            warn!(
                "💻️ Razorpay order {} was created for {}, but {amount} was requested",
                created.id,
                MinorUnits::from(created.amount)
            );
        }
        Ok(PaymentIntent {
            intent_id: created.id.into(),
            amount,
            currency: created.currency,
            receipt: created.receipt.unwrap_or(receipt),
            status: created.status,
        })
    }
}
