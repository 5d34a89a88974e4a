//! #  Database management and control.
//!
//! The traits in this module define what a storage backend must provide for the order reconciliation engine.
//!
//! * [`OrderManagement`] covers the `orders` table: inserting new orders, lookups and the compare-and-swap status
//!   transition that every verification path goes through.
//! * [`CatalogManagement`] is a read-only view of the course catalog and user accounts. Those records are owned by
//!   other services; the engine only needs titles, prices and e-mail addresses.
//! * [`PaymentGatewayDatabase`] bundles the two together with connection housekeeping.
mod catalog_management;
mod order_management;
mod payment_gateway_database;

pub use catalog_management::CatalogManagement;
pub use order_management::OrderManagement;
pub use payment_gateway_database::PaymentGatewayDatabase;
