//! # Razorpay tools
//!
//! A thin client for the parts of the Razorpay REST API that the course payment server needs, i.e. creating orders
//! (payment intents), plus the data types used in Razorpay webhook notifications.
//!
//! The client holds a single `reqwest::Client` and is cheap to clone. It does not retry failed requests.
mod api;
mod config;
mod error;
mod webhook;

pub mod data_objects;

pub use api::RazorpayApi;
pub use config::RazorpayConfig;
pub use data_objects::{NewRazorpayOrder, RazorpayOrder};
pub use error::RazorpayApiError;
pub use webhook::{PaymentEntity, WebhookEvent, WEBHOOK_SIGNATURE_HEADER};
