//! In-memory stand-ins for the payment gateway and e-mail transport.
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
    Mutex,
};

use crate::{
    db_types::GatewayOrderId,
    notifications::{EmailError, EmailMessage, EmailTransport},
    traits::{GatewayError, NewIntent, PaymentGateway, PaymentIntent},
};

/// Hands out sequential intent ids, or fails every call if constructed with [`FakeGateway::failing`].
#[derive(Debug, Clone, Default)]
pub struct FakeGateway {
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<NewIntent>>>,
    failure: Option<GatewayError>,
}

impl FakeGateway {
    pub fn failing(error: GatewayError) -> Self {
        Self { failure: Some(error), ..Default::default() }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<NewIntent> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl PaymentGateway for FakeGateway {
    fn provider(&self) -> &'static str {
        "razorpay"
    }

    fn public_key_id(&self) -> String {
        "rzp_test_key".to_string()
    }

    async fn create_intent(&self, intent: NewIntent) -> Result<PaymentIntent, GatewayError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(intent.clone());
        }
        if let Some(e) = &self.failure {
            return Err(e.clone());
        }
        Ok(PaymentIntent {
            intent_id: GatewayOrderId::new(format!("order_test{n:06}")),
            amount: intent.amount,
            currency: intent.currency,
            receipt: intent.receipt,
            status: "created".to_string(),
        })
    }
}

/// Records every message it is asked to send.
#[derive(Debug, Clone)]
pub struct RecordingMailer {
    enabled: bool,
    fail_with: Option<EmailError>,
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl Default for RecordingMailer {
    fn default() -> Self {
        Self { enabled: true, fail_with: None, sent: Arc::new(Mutex::new(Vec::new())) }
    }
}

impl RecordingMailer {
    pub fn disabled() -> Self {
        Self { enabled: false, ..Default::default() }
    }

    pub fn failing(error: EmailError) -> Self {
        Self { fail_with: Some(error), ..Default::default() }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl EmailTransport for RecordingMailer {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn sender_name(&self) -> String {
        "MiniCourse Admin".to_string()
    }

    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message);
        }
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}
