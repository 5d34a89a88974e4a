use std::str::FromStr;

use coursepay_engine::{
    db_types::OrderStatusType,
    order_objects::{VerifyPaymentRequest, WebhookOutcome},
    test_utils::prepare_env::{payment_signature, payment_webhook_body, webhook_signature},
    AccountApi,
    OrderManagement,
};
use cucumber::{then, when};
use log::*;

use crate::cucumber::{
    payment_world::{KEY_SECRET, WEBHOOK_SECRET},
    PaymentWorld,
};

#[when(expr = "'{word}' starts checkout for course '{word}' as order '{word}'")]
async fn start_checkout(world: &mut PaymentWorld, user: String, course: String, name: String) {
    match world.api().create_order(&user, &course).await {
        Ok(created) => {
            debug!("🚀️ Created order {name}: {}", created.order.gateway_order_id);
            world.orders.insert(name, created.order);
            world.last_error = None;
        },
        Err(e) => panic!("Checkout for {course} failed: {e}"),
    }
}

#[when(expr = "'{word}' tries to start checkout for course '{word}'")]
async fn try_checkout(world: &mut PaymentWorld, user: String, course: String) {
    match world.api().create_order(&user, &course).await {
        Ok(created) => panic!("Checkout was expected to fail, but created {}", created.order.gateway_order_id),
        Err(e) => world.last_error = Some(e),
    }
}

#[when(expr = "'{word}' verifies order '{word}' with payment '{word}' and a {word} signature")]
async fn verify_order(world: &mut PaymentWorld, user: String, name: String, payment: String, quality: String) {
    let gid = world.order(&name).gateway_order_id.to_string();
    let mut signature = payment_signature(&gid, &payment, KEY_SECRET);
    match quality.as_str() {
        "genuine" => {},
        "tampered" => signature = signature.chars().rev().collect(),
        other => panic!("Unknown signature quality: {other}"),
    }
    let request = VerifyPaymentRequest::new(gid, payment, signature);
    match world.api().verify_payment(&user, request).await {
        Ok(verified) => {
            world.last_verification = Some(verified);
            world.last_error = None;
        },
        Err(e) => {
            world.last_verification = None;
            world.last_error = Some(e);
        },
    }
}

#[when(expr = "the gateway sends a '{word}' webhook for order '{word}' with payment '{word}' and status '{word}'")]
async fn signed_webhook(world: &mut PaymentWorld, event: String, name: String, payment: String, status: String) {
    let gid = world.order(&name).gateway_order_id.to_string();
    let body = payment_webhook_body(&event, &gid, &payment, &status);
    let signature = webhook_signature(&body, WEBHOOK_SECRET);
    deliver_webhook(world, body, signature).await;
}

#[when(expr = "the gateway sends a '{word}' webhook for order '{word}' with an invalid signature")]
async fn forged_webhook(world: &mut PaymentWorld, event: String, name: String) {
    let gid = world.order(&name).gateway_order_id.to_string();
    let body = payment_webhook_body(&event, &gid, "pay_forged", "captured");
    let signature = webhook_signature(&body, "not_the_webhook_secret");
    deliver_webhook(world, body, signature).await;
}

async fn deliver_webhook(world: &mut PaymentWorld, body: String, signature: String) {
    match world.api().process_webhook(body.as_bytes(), &signature).await {
        Ok(outcome) => {
            world.last_webhook = Some(outcome);
            world.last_error = None;
        },
        Err(e) => {
            world.last_webhook = None;
            world.last_error = Some(e);
        },
    }
}

#[then(expr = "order '{word}' is {word}")]
async fn order_status(world: &mut PaymentWorld, name: String, status: String) {
    let expected = OrderStatusType::from_str(&status).expect("Not a valid order status");
    let id = world.order(&name).id;
    let order = world.api().db().fetch_order(id).await.expect("Error fetching order").expect("Order not found");
    assert_eq!(order.status, expected, "Order {name} has status {}", order.status);
    world.orders.insert(name, order);
}

#[then(expr = "order '{word}' has payment id '{word}'")]
async fn order_payment_id(world: &mut PaymentWorld, name: String, payment: String) {
    let id = world.order(&name).id;
    let order = world.api().db().fetch_order(id).await.expect("Error fetching order").expect("Order not found");
    assert_eq!(order.gateway_payment_id.as_deref(), Some(payment.as_str()));
}

#[then(expr = "order '{word}' is for {int} minor units in {word}")]
async fn order_amount(world: &mut PaymentWorld, name: String, amount: i64, currency: String) {
    let order = world.order(&name);
    assert_eq!(order.amount.value(), amount);
    assert_eq!(order.currency, currency);
}

#[then(expr = "the verification reports {word}")]
async fn verification_report(world: &mut PaymentWorld, report: String) {
    let verified = world.last_verification.as_ref().expect("No verification result recorded");
    match report.as_str() {
        "fresh" => assert!(!verified.already_verified, "Expected a fresh verification"),
        "replay" => assert!(verified.already_verified, "Expected the order to be reported as already verified"),
        other => panic!("Unknown verification report: {other}"),
    }
}

#[then(expr = "the request fails with '{word}'")]
async fn request_fails(world: &mut PaymentWorld, kind: String) {
    let err = world.last_error.as_ref().expect("The last request did not fail");
    assert_eq!(err.kind(), kind, "Unexpected error: {err}");
}

#[then("the webhook is applied")]
async fn webhook_applied(world: &mut PaymentWorld) {
    let outcome = world.last_webhook.as_ref().expect("No webhook outcome recorded");
    assert!(outcome.is_processed(), "Webhook was not processed: {outcome:?}");
}

#[then(expr = "the webhook is not processed because {string}")]
async fn webhook_skipped(world: &mut PaymentWorld, reason: String) {
    match world.last_webhook.as_ref().expect("No webhook outcome recorded") {
        WebhookOutcome::NotProcessed(r) => assert_eq!(r.to_string(), reason),
        WebhookOutcome::Applied(order) => panic!("Webhook unexpectedly applied to order {}", order.id),
    }
}

#[then(expr = "{int} confirmation email(s) has/have been sent")]
async fn emails_sent(world: &mut PaymentWorld, count: usize) {
    let sent = world.system().mailer.sent();
    assert_eq!(sent.len(), count, "Emails sent: {sent:?}");
}

#[then(expr = "'{word}' owns {int} course(s)")]
async fn purchase_count(world: &mut PaymentWorld, user: String, count: usize) {
    let accounts = AccountApi::new(world.api().db().clone());
    let purchases = accounts.purchases_for_user(&user).await.expect("Error fetching purchases");
    assert_eq!(purchases.len(), count);
}
