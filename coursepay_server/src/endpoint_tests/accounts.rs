use actix_web::{http::StatusCode, test, test::TestRequest, App};
use coursepay_engine::test_utils::prepare_env::{payment_webhook_body, webhook_signature};
use serde_json::json;

use super::{
    helpers::{authorized, call, configure_app, seeded_db, WEBHOOK_SECRET},
    mocks::{gateway_issuing, idle_gateway, mailer_expecting},
};

#[actix_web::test]
async fn no_purchases_yet() {
    let db = seeded_db().await;
    let app = test::init_service(App::new().configure(configure_app(db, idle_gateway(), mailer_expecting(0)))).await;
    let req = authorized(TestRequest::get().uri("/api/orders/mine"), "alice");
    let (status, body) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"], json!([]));
}

#[actix_web::test]
async fn only_paid_orders_are_listed() {
    let db = seeded_db().await;
    let app = test::init_service(
        App::new().configure(configure_app(db, gateway_issuing(&["order_AC0001", "order_AC0002"]), mailer_expecting(0))),
    )
    .await;
    // Two checkouts; only the second one is paid
    for _ in 0..2 {
        let req =
            authorized(TestRequest::post().uri("/api/orders"), "alice").set_json(json!({"courseId": "rust101"}));
        let (status, _) = call(&app, req.to_request()).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let payload = payment_webhook_body("payment.captured", "order_AC0002", "pay_AC0002", "captured");
    let signature = webhook_signature(&payload, WEBHOOK_SECRET);
    let req = TestRequest::post()
        .uri("/webhook/razorpay")
        .insert_header(("X-Razorpay-Signature", signature))
        .set_payload(payload);
    let (status, _) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::OK);

    let req = authorized(TestRequest::get().uri("/api/orders/mine"), "alice");
    let (status, body) = call(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["razorpayOrderId"], "order_AC0002");
    assert_eq!(orders[0]["status"], "paid");
    assert_eq!(orders[0]["course"]["title"], "Rust for Beginners");

    // Bob has bought nothing
    let req = authorized(TestRequest::get().uri("/api/orders/mine"), "bob");
    let (_, body) = call(&app, req.to_request()).await;
    assert_eq!(body["orders"], json!([]));
}
