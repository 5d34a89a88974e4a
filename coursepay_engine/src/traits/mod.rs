//! Interfaces to the external services the engine depends on.
//!
//! * [`PaymentGateway`] creates payment intents with the payment provider. The server supplies the Razorpay
//!   implementation; tests supply mocks.
//!
//! The e-mail transport lives with the rest of the notification code in [`crate::notifications`].
mod payment_gateway;

pub use payment_gateway::{GatewayError, NewIntent, PaymentGateway, PaymentIntent};
