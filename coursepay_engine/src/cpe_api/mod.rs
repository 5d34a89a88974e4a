//! # Course payment engine public API
//!
//! * [`order_flow_api`] creates payment intents and reconciles their outcomes, whichever path (browser callback or
//!   gateway webhook) reports them first.
//! * [`accounts_api`] answers read-only questions about a user's purchases.
//!
//! The other submodules are the request and response types these APIs exchange, and the error type.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits the API needs,
//! plus whichever external services it talks to.
//!
//! ```rust,ignore
//! use coursepay_engine::{AccountApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/coursepay.db", 5).await?;
//! let api = AccountApi::new(db);
//! let purchases = api.purchases_for_user("6650c8f2a1b2c3d4e5f60718").await?;
//! ```
pub mod accounts_api;
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
