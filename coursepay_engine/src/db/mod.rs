mod errors;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use errors::OrderStoreError;
