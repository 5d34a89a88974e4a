use std::fmt::Debug;

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
};
use chrono::{Duration, Utc};
use coursepay_common::Secret;
use coursepay_engine::{
    events::EventProducers,
    test_utils::prepare_env::{prepare_test_env, random_db_path, seed_course, seed_user},
    AccountApi,
    OrderFlowApi,
    OrderFlowConfig,
    SqliteDatabase,
};
use log::*;
use rust_decimal::Decimal;
use serde_json::Value;

use super::mocks::{MockGateway, MockMailer};
use crate::{
    auth::{issue_token, JwtClaims, TokenVerifier},
    config::AuthConfig,
    routes::{CreateOrderRoute, MyOrdersRoute, RazorpayWebhookRoute, VerifyPaymentRoute},
    server::json_config,
};

pub const JWT_SECRET: &str = "endpoint-test-jwt-secret";
pub const KEY_SECRET: &str = "rzp_endpoint_secret";
pub const WEBHOOK_SECRET: &str = "whsec_endpoint";

/// A fresh SQLite database with two users and a course.
pub async fn seeded_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    seed_user(&db, "alice", Some("Alice"), Some("alice@example.com")).await;
    seed_user(&db, "bob", Some("Bob"), Some("bob@example.com")).await;
    seed_course(&db, "rust101", "Rust for Beginners", Decimal::new(4999, 2)).await;
    debug!("🚀️ Seeded test database at {url}");
    db
}

pub fn configure_app(
    db: SqliteDatabase,
    gateway: MockGateway,
    mailer: MockMailer,
) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let config = OrderFlowConfig {
            currency: "INR".to_string(),
            key_secret: Secret::new(KEY_SECRET.to_string()),
            webhook_secret: Secret::new(WEBHOOK_SECRET.to_string()),
        };
        let orders_api = OrderFlowApi::new(db.clone(), gateway, mailer, config, EventProducers::default());
        let accounts_api = AccountApi::new(db);
        cfg.app_data(json_config())
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(TokenVerifier::new(&AuthConfig::new(JWT_SECRET))))
            .service(
                web::scope("/api")
                    .service(CreateOrderRoute::<SqliteDatabase, MockGateway, MockMailer>::new())
                    .service(VerifyPaymentRoute::<SqliteDatabase, MockGateway, MockMailer>::new())
                    .service(MyOrdersRoute::<SqliteDatabase>::new()),
            )
            .service(
                web::scope("/webhook").service(RazorpayWebhookRoute::<SqliteDatabase, MockGateway, MockMailer>::new()),
            );
    }
}

pub fn token_for(user: &str) -> String {
    let claims = JwtClaims {
        sub: user.to_string(),
        email: Some(format!("{user}@example.com")),
        role: Some("user".to_string()),
        exp: (Utc::now() + Duration::days(1)).timestamp(),
    };
    issue_token(&claims, &AuthConfig::new(JWT_SECRET)).expect("Failed to sign token")
}

pub fn authorized(req: TestRequest, user: &str) -> TestRequest {
    req.insert_header(("Authorization", format!("Bearer {}", token_for(user))))
}

/// Sends the request and returns the status with the body as JSON (or as a JSON string, if it wasn't JSON).
pub async fn call<S, R, B, E>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = E>,
    B: MessageBody,
    E: Debug,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let json = serde_json::from_slice(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
    debug!("🚀️ Response {status}: {json}");
    (status, json)
}
