//! Adapters that connect the engine's provider-agnostic traits to concrete services.
pub mod razorpay;
pub mod sendgrid;

pub use razorpay::RazorpayGateway;
pub use sendgrid::SendGridMailer;
