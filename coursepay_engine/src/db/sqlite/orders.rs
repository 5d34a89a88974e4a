use chrono::Utc;
use sqlx::SqliteConnection;

use crate::{
    db::OrderStoreError,
    db_types::{GatewayOrderId, NewOrder, Order, OrderStatusType, OrderTransition},
};

/// Inserts a new order into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
///
/// Single-row queries in this module are drained with `fetch_all`. A statement that is abandoned after its first row
/// keeps its implicit transaction open, which hides the write from (or pins a stale snapshot on) other connections in
/// the pool.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderStoreError> {
    let now = Utc::now();
    let gateway_order_id = order.gateway_order_id.to_string();
    let rows = sqlx::query_as::<_, Order>(
        r#"
            INSERT INTO orders (
                user_id,
                course_id,
                provider,
                amount,
                currency,
                receipt,
                gateway_order_id,
                status,
                created_at,
                updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *;
        "#,
    )
    .bind(order.user_id)
    .bind(order.course_id)
    .bind(order.provider)
    .bind(order.amount)
    .bind(order.currency)
    .bind(order.receipt)
    .bind(order.gateway_order_id)
    .bind(OrderStatusType::Pending)
    .bind(now)
    .bind(now)
    .fetch_all(conn)
    .await
    .map_err(|e| OrderStoreError::from_insert_error(e, &gateway_order_id))?;
    rows.into_iter()
        .next()
        .ok_or_else(|| OrderStoreError::QueryError(format!("Insert of order {gateway_order_id} returned no row")))
}

pub async fn fetch_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, OrderStoreError> {
    let orders: Vec<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = ?").bind(id).fetch_all(conn).await?;
    Ok(orders.into_iter().next())
}

pub async fn fetch_order_by_gateway_id(
    id: &GatewayOrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, OrderStoreError> {
    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE gateway_order_id = ?").bind(id.as_str()).fetch_all(conn).await?;
    Ok(orders.into_iter().next())
}

pub async fn fetch_paid_order_for(
    user_id: &str,
    course_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, OrderStoreError> {
    let orders: Vec<Order> = sqlx::query_as(
        "SELECT * FROM orders WHERE user_id = ? AND course_id = ? AND status = ? ORDER BY id ASC LIMIT 1",
    )
    .bind(user_id)
    .bind(course_id)
    .bind(OrderStatusType::Paid)
    .fetch_all(conn)
    .await?;
    Ok(orders.into_iter().next())
}

pub async fn fetch_paid_orders_for_user(
    user_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, OrderStoreError> {
    let orders = sqlx::query_as(
        r#"
            SELECT * FROM orders
            WHERE user_id = ? AND status = ?
            ORDER BY verified_at DESC, created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .bind(OrderStatusType::Paid)
    .fetch_all(conn)
    .await?;
    Ok(orders)
}

/// The compare-and-swap that every status change goes through. The `WHERE status = 'pending'` guard makes the first
/// terminal write win; any later writer sees zero affected rows and gets `None`.
///
/// Fields in the transition that are `None` leave the stored value untouched.
pub async fn try_transition(
    id: i64,
    transition: OrderTransition,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, OrderStoreError> {
    let rows: Vec<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET
                status = ?,
                gateway_payment_id = COALESCE(?, gateway_payment_id),
                signature = COALESCE(?, signature),
                verified_at = COALESCE(?, verified_at),
                updated_at = ?
            WHERE id = ? AND status = ?
            RETURNING *;
        "#,
    )
    .bind(transition.status)
    .bind(transition.payment_id)
    .bind(transition.signature)
    .bind(transition.verified_at)
    .bind(Utc::now())
    .bind(id)
    .bind(OrderStatusType::Pending)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().next())
}
