use actix_web::{http::StatusCode, test, test::TestRequest, App};
use chrono::{Duration, Utc};
use serde_json::json;

use super::{
    helpers::{call, configure_app, seeded_db, JWT_SECRET},
    mocks::{idle_gateway, mailer_expecting},
};
use crate::{
    auth::{issue_token, JwtClaims},
    config::AuthConfig,
};

fn token(secret: &str, expires_in: Duration) -> String {
    let claims = JwtClaims {
        sub: "alice".to_string(),
        email: Some("alice@example.com".to_string()),
        role: None,
        exp: (Utc::now() + expires_in).timestamp(),
    };
    issue_token(&claims, &AuthConfig::new(secret)).unwrap()
}

async fn create_order_with_header(header: Option<String>) -> (StatusCode, serde_json::Value) {
    let _ = env_logger::try_init();
    let db = seeded_db().await;
    let app = test::init_service(App::new().configure(configure_app(db, idle_gateway(), mailer_expecting(0)))).await;
    let mut req = TestRequest::post().uri("/api/orders").set_json(json!({"courseId": "rust101"}));
    if let Some(header) = header {
        req = req.insert_header(("Authorization", header));
    }
    call(&app, req.to_request()).await
}

#[actix_web::test]
async fn no_token() {
    let (status, body) = create_order_with_header(None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "Invalid or missing token");
}

#[actix_web::test]
async fn not_a_bearer_token() {
    let (status, _) = create_order_with_header(Some(format!("Basic {}", token(JWT_SECRET, Duration::hours(1))))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn expired_token() {
    let (status, body) = create_order_with_header(Some(format!("Bearer {}", token(JWT_SECRET, -Duration::days(1))))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "Invalid or missing token");
}

#[actix_web::test]
async fn token_from_another_issuer() {
    let (status, _) =
        create_order_with_header(Some(format!("Bearer {}", token("some-other-secret", Duration::hours(1))))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
