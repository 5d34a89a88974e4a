//! Payment confirmation e-mails.
//!
//! The engine formats the message and hands it to an [`EmailTransport`]. Sending is strictly best-effort: every
//! failure is folded into an [`EmailOutcome`] and never fails the payment flow that triggered it.
mod email;
mod templates;

pub use email::{send_payment_confirmation, EmailError, EmailMessage, EmailOutcome, EmailTransport};
pub use templates::PaymentConfirmation;
