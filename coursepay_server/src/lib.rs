//! # Course payment server
//! This crate hosts the HTTP server for course purchases. It is responsible for:
//! Starting checkout for a course by creating a Razorpay order.
//! Verifying the payment details that the browser hands back after checkout.
//! Receiving Razorpay webhooks and reconciling them with the stored orders.
//! Listing the courses a user has bought.
//!
//! The reconciliation logic itself lives in `coursepay_engine`. This crate provides the HTTP surface, access token
//! checks and the Razorpay and SendGrid integrations.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /api/orders`: Start checkout for a course.
//! * `POST /api/orders/verify`: Verify a completed checkout.
//! * `GET /api/orders/mine`: The courses the caller has paid for.
//! * `POST /webhook/razorpay`: Razorpay payment notifications.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;
