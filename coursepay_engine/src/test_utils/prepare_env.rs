use coursepay_common::Secret;
use log::*;
use rust_decimal::Decimal;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::{helpers::sign_message, SqliteDatabase};

pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    run_migrations(url).await;
}

/// A fresh database file in the system temp directory.
pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/coursepay_test_{}.db", dir.display(), rand::random::<u64>())
}

pub async fn run_migrations(url: &str) {
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
}

pub async fn create_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        trace!("Database {url} was not dropped: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}

pub async fn seed_user(db: &SqliteDatabase, id: &str, name: Option<&str>, email: Option<&str>) {
    sqlx::query("INSERT INTO users (id, name, email) VALUES (?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(email)
        .execute(db.pool())
        .await
        .expect("Error seeding user");
}

pub async fn seed_course(db: &SqliteDatabase, id: &str, title: &str, price: Decimal) {
    sqlx::query("INSERT INTO courses (id, title, description, category, price) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(title)
        .bind(format!("All about {title}"))
        .bind("Programming")
        .bind(price.to_string())
        .execute(db.pool())
        .await
        .expect("Error seeding course");
}

/// The signature the checkout widget would produce for a genuine payment.
pub fn payment_signature(gateway_order_id: &str, payment_id: &str, key_secret: &str) -> String {
    let message = format!("{gateway_order_id}|{payment_id}");
    sign_message(message.as_bytes(), &Secret::new(key_secret.to_string())).expect("Error signing payment")
}

/// The signature the gateway would put on a webhook body.
pub fn webhook_signature(body: &str, webhook_secret: &str) -> String {
    sign_message(body.as_bytes(), &Secret::new(webhook_secret.to_string())).expect("Error signing webhook")
}

/// A `payment.*` webhook body in the shape the gateway sends.
pub fn payment_webhook_body(event: &str, gateway_order_id: &str, payment_id: &str, status: &str) -> String {
    serde_json::json!({
        "entity": "event",
        "event": event,
        "contains": ["payment"],
        "payload": {
            "payment": {
                "entity": {
                    "id": payment_id,
                    "entity": "payment",
                    "amount": 4999,
                    "currency": "INR",
                    "status": status,
                    "order_id": gateway_order_id
                }
            }
        }
    })
    .to_string()
}
