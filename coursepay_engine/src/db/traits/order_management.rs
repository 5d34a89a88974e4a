use crate::{
    db::OrderStoreError,
    db_types::{GatewayOrderId, NewOrder, Order, OrderTransition},
};

/// The `OrderManagement` trait defines the behaviour for storing and querying orders in the database backend.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Stores a brand-new `pending` order and returns it as persisted.
    ///
    /// Gateway order ids are unique. Inserting a second order with the same id returns
    /// [`OrderStoreError::DuplicateOrder`].
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError>;

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderStoreError>;

    async fn fetch_order_by_gateway_id(&self, id: &GatewayOrderId) -> Result<Option<Order>, OrderStoreError>;

    /// Returns the `paid` order for the given user and course, if there is one.
    async fn fetch_paid_order_for(&self, user_id: &str, course_id: &str) -> Result<Option<Order>, OrderStoreError>;

    /// All `paid` orders for the user, most recently verified first.
    async fn fetch_paid_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, OrderStoreError>;

    /// Atomically moves a `pending` order into the state described by `transition`.
    ///
    /// The update is conditional on the order still being `pending`. If it is, the updated order is returned. If
    /// another writer got there first (or the order does not exist), nothing is written and `None` is returned. The
    /// caller should then re-read the order to find out what happened.
    async fn try_transition(&self, id: i64, transition: OrderTransition) -> Result<Option<Order>, OrderStoreError>;
}
