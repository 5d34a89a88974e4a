use std::{collections::HashMap, fmt::Debug};

use coursepay_common::{MinorUnits, Secret, DEFAULT_CURRENCY_CODE};
use log::*;
use razorpay_tools::WebhookEvent;

use crate::{
    cpe_api::{
        errors::OrderFlowError,
        order_objects::{CreatedOrder, NotProcessedReason, VerifiedPayment, VerifyPaymentRequest, WebhookOutcome},
    },
    db::traits::PaymentGatewayDatabase,
    db_types::{Course, GatewayOrderId, NewOrder, Order, OrderStatusType, OrderTransition},
    events::{EventProducers, OrderFailedEvent, OrderPaidEvent, VerificationSource},
    helpers::{new_receipt, to_minor_units, verify_payment_signature, verify_webhook_signature},
    notifications::{send_payment_confirmation, EmailOutcome, EmailTransport},
    traits::{NewIntent, PaymentGateway},
};

/// Settings the order flow needs from the gateway configuration.
#[derive(Debug, Clone)]
pub struct OrderFlowConfig {
    /// Currency that intents are created in. Upper-cased before use.
    pub currency: String,
    /// Signs the browser callback (`"{order_id}|{payment_id}"`).
    pub key_secret: Secret<String>,
    /// Signs webhook bodies.
    pub webhook_secret: Secret<String>,
}

impl Default for OrderFlowConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            key_secret: Secret::default(),
            webhook_secret: Secret::default(),
        }
    }
}

/// Maps a provider payment status onto the order status it implies. `None` means the event carries no terminal
/// outcome (e.g. `created`) and the order should be left alone.
pub fn status_for_payment_event(status: &str) -> Option<OrderStatusType> {
    match status.trim().to_ascii_lowercase().as_str() {
        "captured" | "authorized" => Some(OrderStatusType::Paid),
        "failed" | "refunded" | "cancelled" => Some(OrderStatusType::Failed),
        _ => None,
    }
}

/// `OrderFlowApi` is the primary API for the payment flow. It creates payment intents for course purchases and
/// reconciles their outcomes.
///
/// Outcomes arrive along two independent paths that may be duplicated, delayed or reordered:
/// * the browser callback, via [`Self::verify_payment`];
/// * the gateway's server-to-server webhook, via [`Self::process_webhook`].
///
/// Both paths funnel every status change through the store's compare-and-swap
/// ([`try_transition`](crate::OrderManagement::try_transition)), so whichever terminal write lands first wins and the
/// other becomes a no-op. Only the browser path sends a confirmation e-mail, and only for the call that actually
/// moved the order to `paid`.
pub struct OrderFlowApi<B, G, E> {
    db: B,
    gateway: G,
    mailer: E,
    config: OrderFlowConfig,
    producers: EventProducers,
}

impl<B, G, E> Debug for OrderFlowApi<B, G, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, G, E> OrderFlowApi<B, G, E> {
    pub fn new(db: B, gateway: G, mailer: E, config: OrderFlowConfig, producers: EventProducers) -> Self {
        Self { db, gateway, mailer, config, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B, G, E> OrderFlowApi<B, G, E>
where
    B: PaymentGatewayDatabase,
    G: PaymentGateway,
    E: EmailTransport,
{
    /// Starts a purchase of `course_id` by `user_id`.
    ///
    /// The course price is converted to minor units (rounding half away from zero), a single payment intent is
    /// created with the gateway, and a `pending` order is stored against it. Nothing is stored if the gateway call
    /// fails.
    ///
    /// Fails with `Conflict` if the user already owns the course.
    pub async fn create_order(&self, user_id: &str, course_id: &str) -> Result<CreatedOrder, OrderFlowError> {
        let course_id = course_id.trim();
        if course_id.is_empty() {
            return Err(OrderFlowError::InvalidRequest("Course is required".into()));
        }
        if user_id.trim().is_empty() {
            return Err(OrderFlowError::InvalidRequest("User is required".into()));
        }
        let course = self
            .db
            .fetch_course(course_id)
            .await?
            .ok_or_else(|| OrderFlowError::NotFound("Course not found".into()))?;
        let amount = to_minor_units(course.price).filter(MinorUnits::is_positive).ok_or_else(|| {
            OrderFlowError::InvalidState("Course price must be greater than zero to initiate payment".into())
        })?;
        if let Some(existing) = self.db.fetch_paid_order_for(user_id, &course.id).await? {
            debug!("🔄️📦️ User {user_id} already owns course {} through order #{}", course.id, existing.id);
            return Err(OrderFlowError::Conflict("You have already purchased this course".into()));
        }
        let currency = self.config.currency.trim().to_uppercase();
        let receipt = new_receipt();
        let notes = HashMap::from([
            ("courseId".to_string(), course.id.clone()),
            ("userId".to_string(), user_id.to_string()),
        ]);
        let new_intent = NewIntent { amount, currency: currency.clone(), receipt: receipt.clone(), notes };
        let intent = self.gateway.create_intent(new_intent).await.map_err(|e| {
            warn!("🔄️📦️ Could not create a payment intent for course {} ({receipt}). {e}", course.id);
            e
        })?;
        let new_order = NewOrder {
            user_id: user_id.to_string(),
            course_id: course.id.clone(),
            provider: self.gateway.provider().to_string(),
            amount,
            currency,
            receipt,
            gateway_order_id: intent.intent_id.clone(),
        };
        let order = self.db.insert_order(new_order).await.map_err(|e| {
            error!(
                "🔄️📦️ Payment intent {} was created, but the order could not be saved. The intent is orphaned. {e}",
                intent.intent_id
            );
            OrderFlowError::from(e)
        })?;
        info!("🔄️📦️ Order #{} [{}] created for course {}. {amount} due", order.id, order.gateway_order_id, course.id);
        Ok(CreatedOrder { order, course: course.into(), intent, key_id: self.gateway.public_key_id() })
    }

    /// Verifies the payment details the checkout widget handed to the browser.
    ///
    /// * An order that is already `paid` is returned as is, with `already_verified` set. No signature check is done
    ///   and no e-mail is sent.
    /// * A bad signature fails the order if it is still pending, and returns `VerificationFailed`.
    /// * A good signature marks the order as paid. If the webhook got there first, the result is the same as the
    ///   already-paid case. If the order had already failed, the failure stands and `InvalidState` is returned.
    ///
    /// Only the call that actually moves the order to `paid` attempts the confirmation e-mail. E-mail problems are
    /// reported in the result and never fail the call.
    pub async fn verify_payment(
        &self,
        user_id: &str,
        request: VerifyPaymentRequest,
    ) -> Result<VerifiedPayment, OrderFlowError> {
        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(OrderFlowError::InvalidRequest(format!(
                "Missing payment verification details: {}",
                missing.join(", ")
            )));
        }
        let gateway_order_id = GatewayOrderId::new(request.gateway_order_id.trim());
        let payment_id = request.payment_id.trim();
        let signature = request.signature.trim();
        let order = self
            .db
            .fetch_order_by_gateway_id(&gateway_order_id)
            .await?
            .ok_or_else(|| OrderFlowError::NotFound("Order not found".into()))?;
        if !order.is_owned_by(user_id) {
            warn!("🔄️✅️ User {user_id} tried to verify order #{}, which belongs to someone else", order.id);
            return Err(OrderFlowError::Forbidden("You are not allowed to verify this order".into()));
        }
        if order.status == OrderStatusType::Paid {
            debug!("🔄️✅️ Order #{} is already paid. Nothing to do", order.id);
            return Ok(self.already_verified(order).await);
        }
        let valid = verify_payment_signature(gateway_order_id.as_str(), payment_id, signature, &self.config.key_secret)?;
        if !valid {
            warn!("🔄️❌️ Invalid payment signature for order #{} [{gateway_order_id}]", order.id);
            if let Some(failed) = self.db.try_transition(order.id, OrderTransition::failed(None)).await? {
                info!("🔄️❌️ Order #{} has been marked as failed", failed.id);
                self.call_order_failed_hook(failed, VerificationSource::Client).await;
            }
            return Err(OrderFlowError::VerificationFailed);
        }
        let transition = OrderTransition::paid(payment_id, signature);
        match self.db.try_transition(order.id, transition).await? {
            Some(paid) => {
                info!("🔄️✅️ Order #{} [{gateway_order_id}] is paid. Payment {payment_id}", paid.id);
                self.call_order_paid_hook(paid.clone(), VerificationSource::Client).await;
                let course = self.course_for(&paid).await;
                let email = self.send_confirmation(&paid, course.as_ref()).await;
                Ok(VerifiedPayment { order: paid, course: course.map(Into::into), email, already_verified: false })
            },
            None => {
                let current = self.db.fetch_order(order.id).await?.ok_or_else(|| {
                    OrderFlowError::DatabaseError(format!("Order #{} disappeared during verification", order.id))
                })?;
                match current.status {
                    OrderStatusType::Paid => {
                        debug!("🔄️✅️ Order #{} was paid by another request in the meantime", current.id);
                        Ok(self.already_verified(current).await)
                    },
                    OrderStatusType::Failed => {
                        warn!("🔄️✅️ A valid payment arrived for order #{}, but it has already failed", current.id);
                        Err(OrderFlowError::InvalidState("Order has already been marked as failed".into()))
                    },
                    OrderStatusType::Pending => {
                        error!("🔄️✅️ Order #{} is still pending after a rejected status update", current.id);
                        Err(OrderFlowError::DatabaseError(format!("Order #{} could not be updated", current.id)))
                    },
                }
            },
        }
    }

    /// Reconciles a gateway webhook notification.
    ///
    /// The signature is checked over `raw_body` exactly as received, before any parsing. Apart from a bad signature
    /// (and configuration or database failures), every notification is accepted and classified, so that the gateway
    /// does not keep redelivering notifications that can never be applied.
    ///
    /// Webhook completions never send e-mail.
    pub async fn process_webhook(&self, raw_body: &[u8], signature: &str) -> Result<WebhookOutcome, OrderFlowError> {
        let signature = signature.trim();
        if !verify_webhook_signature(raw_body, signature, &self.config.webhook_secret)? {
            warn!("🪝️ Rejected a webhook with an invalid signature");
            return Err(OrderFlowError::InvalidSignature);
        }
        let event = match WebhookEvent::from_slice(raw_body) {
            Ok(event) => event,
            Err(e) => {
                warn!("🪝️ Could not parse webhook body. {e}");
                return Ok(WebhookOutcome::NotProcessed(NotProcessedReason::MalformedPayload));
            },
        };
        let Some(payment) = event.payment_entity() else {
            debug!("🪝️ Webhook event '{}' carries no payment entity. Ignoring", event.event);
            return Ok(WebhookOutcome::NotProcessed(NotProcessedReason::MalformedPayload));
        };
        let gateway_order_id = GatewayOrderId::new(payment.order_id.as_deref().unwrap_or_default());
        let Some(order) = self.db.fetch_order_by_gateway_id(&gateway_order_id).await? else {
            info!("🪝️ Webhook '{}' refers to unknown order {gateway_order_id}. Ignoring", event.event);
            return Ok(WebhookOutcome::NotProcessed(NotProcessedReason::UnknownOrder));
        };
        let reported = status_for_payment_event(&payment.status);
        if order.status.is_terminal() {
            match reported {
                Some(status) if status != order.status => warn!(
                    "🪝️ Webhook '{}' reports order #{} as {status}, but it is already {}. The first outcome stands.",
                    event.event, order.id, order.status
                ),
                _ => debug!("🪝️ Webhook '{}' repeats the outcome of order #{} ({})", event.event, order.id, order.status),
            }
            return Ok(WebhookOutcome::NotProcessed(NotProcessedReason::NoStateChange));
        }
        let transition = match reported {
            Some(OrderStatusType::Paid) => Some(OrderTransition::paid(payment.id.as_str(), signature)),
            Some(OrderStatusType::Failed) => Some(OrderTransition::failed(Some(payment.id.clone()))),
            _ => None,
        };
        let Some(transition) = transition else {
            debug!(
                "🪝️ Webhook '{}' (payment status '{}') does not change order #{} ({})",
                event.event, payment.status, order.id, order.status
            );
            return Ok(WebhookOutcome::NotProcessed(NotProcessedReason::NoStateChange));
        };
        let target = transition.status;
        match self.db.try_transition(order.id, transition).await? {
            Some(updated) => {
                info!("🪝️ Order #{} [{gateway_order_id}] is now {target} via webhook '{}'", updated.id, event.event);
                match target {
                    OrderStatusType::Paid => self.call_order_paid_hook(updated.clone(), VerificationSource::Webhook).await,
                    _ => self.call_order_failed_hook(updated.clone(), VerificationSource::Webhook).await,
                }
                Ok(WebhookOutcome::Applied(updated))
            },
            None => {
                warn!(
                    "🪝️ Webhook '{}' wanted order #{} to be {target}, but it has already reached a terminal state. The \
                     first outcome stands.",
                    event.event, order.id
                );
                Ok(WebhookOutcome::NotProcessed(NotProcessedReason::NoStateChange))
            },
        }
    }

    async fn already_verified(&self, order: Order) -> VerifiedPayment {
        let course = self.course_for(&order).await.map(Into::into);
        VerifiedPayment { order, course, email: EmailOutcome::skipped(), already_verified: true }
    }

    async fn course_for(&self, order: &Order) -> Option<Course> {
        self.db.fetch_course(&order.course_id).await.unwrap_or_else(|e| {
            warn!("🔄️ Could not load course {} for order #{}. {e}", order.course_id, order.id);
            None
        })
    }

    async fn send_confirmation(&self, order: &Order, course: Option<&Course>) -> EmailOutcome {
        if !self.mailer.is_enabled() {
            return send_payment_confirmation(&self.mailer, None, course, order).await;
        }
        match self.db.fetch_user(&order.user_id).await {
            Ok(user) => send_payment_confirmation(&self.mailer, user.as_ref(), course, order).await,
            Err(e) => {
                warn!("📧️ Could not load user {} for order #{}. {e}", order.user_id, order.id);
                EmailOutcome::failed(format!("Could not load user details: {e}"))
            },
        }
    }

    async fn call_order_paid_hook(&self, order: Order, source: VerificationSource) {
        for emitter in &self.producers.order_paid_producer {
            debug!("🔄️📦️ Notifying order paid hook subscribers");
            emitter.publish_event(OrderPaidEvent::new(order.clone(), source)).await;
        }
    }

    async fn call_order_failed_hook(&self, order: Order, source: VerificationSource) {
        for emitter in &self.producers.order_failed_producer {
            debug!("🔄️📦️ Notifying order failed hook subscribers");
            emitter.publish_event(OrderFailedEvent::new(order.clone(), source)).await;
        }
    }
}
