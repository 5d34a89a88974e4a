//! Course Payment Engine
//!
//! The engine reconciles course purchases paid through a third-party payment gateway. It is provider-agnostic: the
//! gateway and the e-mail provider are reached through the traits in [`mod@traits`] and
//! [`notifications::EmailTransport`], which the server implements.
//!
//! The library is divided into these main sections:
//! 1. Database management ([`mod@db`]). SQLite is the supported backend. You should never need to access the database
//!    directly. Use the public API instead. The exception is the data types stored in the database, which are defined
//!    in [`db_types`] and are public.
//! 2. The public API (`cpe_api`). [`OrderFlowApi`] creates payment intents and reconciles the outcomes reported by the
//!    browser callback and by gateway webhooks. [`AccountApi`] lists a user's purchases.
//! 3. Signature checks and money conversion ([`helpers`]).
//! 4. Payment confirmation e-mails ([`notifications`]).
//!
//! Every status change goes through a single compare-and-swap in the store, so an order reaches exactly one terminal
//! state no matter how many times, or in which order, the gateway and the browser report the outcome.
//!
//! The engine also emits events when an order is paid or fails. Hook into them with [`events::EventHooks`].
mod cpe_api;
mod db;

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod notifications;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use cpe_api::{
    accounts_api::AccountApi,
    errors::{AccountApiError, OrderFlowError},
    order_flow_api::{status_for_payment_event, OrderFlowApi, OrderFlowConfig},
    order_objects,
};
#[cfg(feature = "sqlite")]
pub use db::sqlite::{create_database_if_missing, SqliteDatabase};
pub use db::{
    traits::{CatalogManagement, OrderManagement, PaymentGatewayDatabase},
    OrderStoreError,
};
