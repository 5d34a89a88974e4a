use crate::db::{
    traits::{CatalogManagement, OrderManagement},
    OrderStoreError,
};

/// This trait defines the highest level of behaviour for backends supporting the course payment engine.
#[allow(async_fn_in_trait)]
pub trait PaymentGatewayDatabase: Clone + OrderManagement + CatalogManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), OrderStoreError> {
        Ok(())
    }
}
