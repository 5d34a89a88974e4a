use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderStoreError {
    #[error("Database driver error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Database query error: {0}")]
    QueryError(String),
    #[error("An order with gateway order id {0} already exists")]
    DuplicateOrder(String),
}

impl OrderStoreError {
    /// Maps unique-constraint violations on insert to [`OrderStoreError::DuplicateOrder`].
    pub fn from_insert_error(e: sqlx::Error, gateway_order_id: &str) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::DuplicateOrder(gateway_order_id.to_string()),
            _ => Self::DriverError(e),
        }
    }
}
