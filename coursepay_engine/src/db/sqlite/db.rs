use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{catalog, db_url, new_pool, orders};
use crate::{
    db::{
        traits::{CatalogManagement, OrderManagement, PaymentGatewayDatabase},
        OrderStoreError,
    },
    db_types::{Course, GatewayOrderId, NewOrder, Order, OrderTransition, User},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `CPS_DATABASE_URL`, or the default.
    pub async fn new(max_connections: u32) -> Result<Self, OrderStoreError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, OrderStoreError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies any outstanding schema migrations.
    pub async fn migrate(&self) -> Result<(), OrderStoreError> {
        sqlx::migrate!("./src/db/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| OrderStoreError::QueryError(format!("Migration failed. {e}")))?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order #{} [{}] has been saved in the DB", order.id, order.gateway_order_id);
        Ok(order)
    }

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order(id, &mut conn).await
    }

    async fn fetch_order_by_gateway_id(&self, id: &GatewayOrderId) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_gateway_id(id, &mut conn).await
    }

    async fn fetch_paid_order_for(&self, user_id: &str, course_id: &str) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_paid_order_for(user_id, course_id, &mut conn).await
    }

    async fn fetch_paid_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_paid_orders_for_user(user_id, &mut conn).await
    }

    async fn try_transition(&self, id: i64, transition: OrderTransition) -> Result<Option<Order>, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let status = transition.status;
        let result = orders::try_transition(id, transition, &mut tx).await?;
        tx.commit().await?;
        match &result {
            Some(_) => debug!("🗃️ Order #{id} moved from pending to {status}"),
            None => debug!("🗃️ Order #{id} was not pending. The transition to {status} was not applied"),
        }
        Ok(result)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_course(&self, course_id: &str) -> Result<Option<Course>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        catalog::fetch_course(course_id, &mut conn).await
    }

    async fn fetch_user(&self, user_id: &str) -> Result<Option<User>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        catalog::fetch_user(user_id, &mut conn).await
    }
}

impl PaymentGatewayDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn close(&mut self) -> Result<(), OrderStoreError> {
        self.pool.close().await;
        Ok(())
    }
}
