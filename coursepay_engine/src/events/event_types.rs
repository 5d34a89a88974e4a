use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// Which notification path landed a terminal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationSource {
    Client,
    Webhook,
}

/// Emitted exactly once per order, when it moves from `pending` to `paid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPaidEvent {
    pub order: Order,
    pub source: VerificationSource,
}

impl OrderPaidEvent {
    pub fn new(order: Order, source: VerificationSource) -> Self {
        Self { order, source }
    }
}

/// Emitted exactly once per order, when it moves from `pending` to `failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFailedEvent {
    pub order: Order,
    pub source: VerificationSource,
}

impl OrderFailedEvent {
    pub fn new(order: Order, source: VerificationSource) -> Self {
        Self { order, source }
    }
}
