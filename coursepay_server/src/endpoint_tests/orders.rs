use actix_web::{http::StatusCode, test, test::TestRequest, App};
use coursepay_engine::{
    test_utils::prepare_env::payment_signature,
    traits::{GatewayError, PaymentIntent},
};
use serde_json::json;

use super::{
    helpers::{authorized, call, configure_app, seeded_db, KEY_SECRET},
    mocks::{gateway_issuing, idle_gateway, mailer_expecting, MockGateway},
};

#[actix_web::test]
async fn create_order_returns_checkout_details() {
    let db = seeded_db().await;
    let app = test::init_service(
        App::new().configure(configure_app(db, gateway_issuing(&["order_EP0001"]), mailer_expecting(0))),
    )
    .await;
    let req = authorized(TestRequest::post().uri("/api/orders"), "alice").set_json(json!({"courseId": "rust101"}));
    let (status, body) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order created");
    assert_eq!(body["order"]["status"], "pending");
    assert_eq!(body["order"]["amount"], 4999);
    assert_eq!(body["order"]["razorpayOrderId"], "order_EP0001");
    assert!(body["order"].get("signature").is_none());
    assert_eq!(body["course"]["title"], "Rust for Beginners");
    assert_eq!(body["payment"]["provider"], "razorpay");
    assert_eq!(body["payment"]["credentials"]["keyId"], "rzp_test_key");
    assert_eq!(body["payment"]["order"]["id"], "order_EP0001");
    assert_eq!(body["payment"]["order"]["amount"], 4999);
    assert_eq!(body["payment"]["order"]["currency"], "INR");
    assert!(body["payment"]["order"]["receipt"].as_str().unwrap().starts_with("order_"));
}

#[actix_web::test]
async fn create_order_for_unknown_course() {
    let db = seeded_db().await;
    let app = test::init_service(App::new().configure(configure_app(db, idle_gateway(), mailer_expecting(0)))).await;
    let req = authorized(TestRequest::post().uri("/api/orders"), "alice").set_json(json!({"courseId": "cobol900"}));
    let (status, body) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Course not found");
}

#[actix_web::test]
async fn create_order_without_course() {
    let db = seeded_db().await;
    let app = test::init_service(App::new().configure(configure_app(db, idle_gateway(), mailer_expecting(0)))).await;
    let req = authorized(TestRequest::post().uri("/api/orders"), "alice").set_json(json!({}));
    let (status, body) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[actix_web::test]
async fn create_order_with_malformed_body() {
    let db = seeded_db().await;
    let app = test::init_service(App::new().configure(configure_app(db, idle_gateway(), mailer_expecting(0)))).await;
    let req = authorized(TestRequest::post().uri("/api/orders"), "alice")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"courseId\": ");
    let (status, body) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[actix_web::test]
async fn gateway_rejections_are_bad_gateway() {
    let db = seeded_db().await;
    let mut gateway = MockGateway::new();
    gateway.expect_provider().return_const("razorpay");
    gateway.expect_public_key_id().return_const("rzp_test_key".to_string());
    gateway.expect_create_intent().times(1).returning(|_| {
        Err::<PaymentIntent, _>(GatewayError::new(
            Some("input_validation_failed".into()),
            Some("The amount must be atleast INR 1.00".into()),
        ))
    });
    let app = test::init_service(App::new().configure(configure_app(db, gateway, mailer_expecting(0)))).await;
    let req = authorized(TestRequest::post().uri("/api/orders"), "alice").set_json(json!({"courseId": "rust101"}));
    let (status, body) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "gateway_error");
    assert_eq!(body["reason"], "input_validation_failed");
    assert_eq!(body["message"], "The amount must be atleast INR 1.00");
}

#[actix_web::test]
async fn verify_then_replay() {
    let db = seeded_db().await;
    // Only the first verification sends a confirmation
    let app = test::init_service(
        App::new().configure(configure_app(db, gateway_issuing(&["order_EP0002"]), mailer_expecting(1))),
    )
    .await;
    let req = authorized(TestRequest::post().uri("/api/orders"), "alice").set_json(json!({"courseId": "rust101"}));
    let (status, _) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::CREATED);

    let verify = json!({
        "razorpayOrderId": "order_EP0002",
        "razorpayPaymentId": "pay_EP0002",
        "razorpaySignature": payment_signature("order_EP0002", "pay_EP0002", KEY_SECRET),
    });
    let req = authorized(TestRequest::post().uri("/api/orders/verify"), "alice").set_json(&verify);
    let (status, body) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Payment verified");
    assert_eq!(body["alreadyVerified"], false);
    assert_eq!(body["order"]["status"], "paid");
    assert_eq!(body["order"]["razorpayPaymentId"], "pay_EP0002");
    assert_eq!(body["email"]["dispatched"], true);
    assert_eq!(body["course"]["id"], "rust101");

    let req = authorized(TestRequest::post().uri("/api/orders/verify"), "alice").set_json(&verify);
    let (status, body) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alreadyVerified"], true);
    assert_eq!(body["email"]["dispatched"], false);
    assert_eq!(body["order"]["status"], "paid");

    // And nobody can buy it twice
    let req = authorized(TestRequest::post().uri("/api/orders"), "alice").set_json(json!({"courseId": "rust101"}));
    let (status, body) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "You have already purchased this course");
}

#[actix_web::test]
async fn verify_with_tampered_signature() {
    let db = seeded_db().await;
    let app = test::init_service(
        App::new().configure(configure_app(db, gateway_issuing(&["order_EP0003"]), mailer_expecting(0))),
    )
    .await;
    let req = authorized(TestRequest::post().uri("/api/orders"), "alice").set_json(json!({"courseId": "rust101"}));
    let (status, _) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::CREATED);

    let verify = json!({
        "razorpayOrderId": "order_EP0003",
        "razorpayPaymentId": "pay_EP0003",
        "razorpaySignature": payment_signature("order_EP0003", "pay_SOMEONE_ELSE", KEY_SECRET),
    });
    let req = authorized(TestRequest::post().uri("/api/orders/verify"), "alice").set_json(&verify);
    let (status, body) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "verification_failed");
}

#[actix_web::test]
async fn verify_someone_elses_order() {
    let db = seeded_db().await;
    let app = test::init_service(
        App::new().configure(configure_app(db, gateway_issuing(&["order_EP0004"]), mailer_expecting(0))),
    )
    .await;
    let req = authorized(TestRequest::post().uri("/api/orders"), "alice").set_json(json!({"courseId": "rust101"}));
    let (status, _) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::CREATED);

    let verify = json!({
        "razorpayOrderId": "order_EP0004",
        "razorpayPaymentId": "pay_EP0004",
        "razorpaySignature": payment_signature("order_EP0004", "pay_EP0004", KEY_SECRET),
    });
    let req = authorized(TestRequest::post().uri("/api/orders/verify"), "bob").set_json(&verify);
    let (status, body) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[actix_web::test]
async fn verify_with_missing_fields() {
    let db = seeded_db().await;
    let app = test::init_service(App::new().configure(configure_app(db, idle_gateway(), mailer_expecting(0)))).await;
    let req = authorized(TestRequest::post().uri("/api/orders/verify"), "alice")
        .set_json(json!({"razorpayOrderId": "order_EP0005"}));
    let (status, body) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Missing payment verification details"), "{message}");
}
