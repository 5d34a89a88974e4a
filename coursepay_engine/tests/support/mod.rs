#![allow(dead_code)]
use std::str::FromStr;

use coursepay_common::Secret;
use coursepay_engine::{
    db_types::Order,
    events::EventProducers,
    order_objects::{CreatedOrder, VerifyPaymentRequest},
    test_utils::{
        prepare_env::{payment_signature, prepare_test_env, random_db_path, seed_course, seed_user},
        test_doubles::{FakeGateway, RecordingMailer},
    },
    OrderFlowApi,
    OrderFlowConfig,
    PaymentGatewayDatabase,
    SqliteDatabase,
};
use log::*;
use rust_decimal::Decimal;
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub const KEY_SECRET: &str = "rzp_test_secret";
pub const WEBHOOK_SECRET: &str = "whsec_test";

pub type TestApi = OrderFlowApi<SqliteDatabase, FakeGateway, RecordingMailer>;

pub struct TestSystem {
    pub url: String,
    pub api: TestApi,
    pub gateway: FakeGateway,
    pub mailer: RecordingMailer,
}

pub async fn setup() -> TestSystem {
    setup_with(FakeGateway::default(), RecordingMailer::default(), EventProducers::default()).await
}

pub async fn setup_with(gateway: FakeGateway, mailer: RecordingMailer, producers: EventProducers) -> TestSystem {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    seed_catalog(&db).await;
    let api = OrderFlowApi::new(db, gateway.clone(), mailer.clone(), flow_config(), producers);
    TestSystem { url, api, gateway, mailer }
}

pub fn flow_config() -> OrderFlowConfig {
    OrderFlowConfig {
        currency: "inr".into(),
        key_secret: Secret::new(KEY_SECRET.to_string()),
        webhook_secret: Secret::new(WEBHOOK_SECRET.to_string()),
    }
}

/// A second API instance over the same database and doubles, the way each server worker gets its own.
pub fn worker_api(system: &TestSystem) -> TestApi {
    OrderFlowApi::new(
        system.api.db().clone(),
        system.gateway.clone(),
        system.mailer.clone(),
        flow_config(),
        EventProducers::default(),
    )
}

pub async fn seed_catalog(db: &SqliteDatabase) {
    seed_user(db, "alice", Some("Alice"), Some("alice@example.com")).await;
    seed_user(db, "bob", Some("Bob"), Some("bob@example.com")).await;
    seed_user(db, "nomail", None, None).await;
    seed_course(db, "rust101", "Rust for Beginners", Decimal::new(4999, 2)).await;
    seed_course(db, "sql201", "Advanced SQL", Decimal::new(1999, 0)).await;
    seed_course(db, "precise", "Precision Pricing", Decimal::from_str("99.995").expect("valid decimal")).await;
    seed_course(db, "free", "Free Intro", Decimal::ZERO).await;
}

pub async fn tear_down(system: TestSystem) {
    let mut db = system.api.db().clone();
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    if let Err(e) = Sqlite::drop_database(&system.url).await {
        warn!("🚀️ Failed to drop database {}: {e}", system.url);
    }
}

pub async fn create_order(system: &TestSystem, user: &str, course: &str) -> CreatedOrder {
    system.api.create_order(user, course).await.expect("Error creating order")
}

/// The verification request a genuine checkout would produce.
pub fn genuine_request(order: &Order, payment_id: &str) -> VerifyPaymentRequest {
    let gid = order.gateway_order_id.as_str();
    VerifyPaymentRequest::new(gid, payment_id, &payment_signature(gid, payment_id, KEY_SECRET))
}

pub fn tampered_request(order: &Order, payment_id: &str) -> VerifyPaymentRequest {
    let gid = order.gateway_order_id.as_str();
    let mut signature = payment_signature(gid, payment_id, KEY_SECRET);
    let last = if signature.ends_with('0') { "1" } else { "0" };
    signature.replace_range(signature.len() - 1.., last);
    VerifyPaymentRequest::new(gid, payment_id, &signature)
}

pub async fn order_count(db: &SqliteDatabase) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders").fetch_one(db.pool()).await.expect("Error counting orders")
}
