use log::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    db_types::{Course, Order, User},
    notifications::PaymentConfirmation,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email transport is not configured")]
    NotConfigured,
    #[error("{0}")]
    MissingData(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Failed to send email: {0}")]
    TransportError(String),
}

/// Whether a confirmation e-mail was handed to the transport and, if not, why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailOutcome {
    pub dispatched: bool,
    pub error: Option<String>,
}

impl EmailOutcome {
    pub fn dispatched() -> Self {
        Self { dispatched: true, error: None }
    }

    /// Nothing was attempted, and that is not an error (e.g. the payment had already been verified).
    pub fn skipped() -> Self {
        Self::default()
    }

    pub fn failed<S: Into<String>>(error: S) -> Self {
        Self { dispatched: false, error: Some(error.into()) }
    }
}

#[allow(async_fn_in_trait)]
pub trait EmailTransport {
    /// False when no e-mail provider has been configured. Disabled transports are never asked to send.
    fn is_enabled(&self) -> bool;

    /// The name used to sign off messages.
    fn sender_name(&self) -> String;

    async fn send(&self, message: EmailMessage) -> Result<(), EmailError>;
}

/// Formats and sends the payment confirmation for a freshly paid order. Never returns an error.
pub async fn send_payment_confirmation<E: EmailTransport>(
    transport: &E,
    user: Option<&User>,
    course: Option<&Course>,
    order: &Order,
) -> EmailOutcome {
    if !transport.is_enabled() {
        debug!("📧️ Email is not configured. No confirmation will be sent for order #{}", order.id);
        return EmailOutcome::skipped();
    }
    let message = match PaymentConfirmation::new(user, course, order, &transport.sender_name()) {
        Ok(confirmation) => confirmation.into_message(),
        Err(e) => {
            warn!("📧️ Cannot send a payment confirmation for order #{}. {e}", order.id);
            return EmailOutcome::failed(e.to_string());
        },
    };
    match transport.send(message).await {
        Ok(()) => {
            info!("📧️ Payment confirmation for order #{} dispatched", order.id);
            EmailOutcome::dispatched()
        },
        Err(e) => {
            warn!("📧️ Payment confirmation for order #{} could not be sent. {e}", order.id);
            EmailOutcome::failed(e.to_string())
        },
    }
}
