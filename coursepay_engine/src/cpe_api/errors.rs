use thiserror::Error;

use crate::{db::OrderStoreError, helpers::SignatureError, traits::GatewayError};

/// Every failure the order flow can report. Each variant maps to a stable, machine-readable [`kind`](Self::kind).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderFlowError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{message}")]
    GatewayError { reason: String, message: String },
    #[error("Payment verification failed")]
    VerificationFailed,
    #[error("Invalid webhook signature")]
    InvalidSignature,
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl OrderFlowError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidState(_) => "invalid_state",
            Self::GatewayError { .. } => "gateway_error",
            Self::VerificationFailed => "verification_failed",
            Self::InvalidSignature => "invalid_signature",
            Self::ConfigurationError(_) => "configuration_error",
            Self::DatabaseError(_) => "internal_error",
        }
    }
}

impl From<OrderStoreError> for OrderFlowError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            // Gateway order ids are unique, so a collision means the gateway handed out an id we have seen before
            OrderStoreError::DuplicateOrder(id) => Self::GatewayError {
                reason: "duplicate_order_id".to_string(),
                message: format!("The payment gateway issued order id {id}, which is already in use"),
            },
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

impl From<SignatureError> for OrderFlowError {
    fn from(e: SignatureError) -> Self {
        Self::ConfigurationError(e.to_string())
    }
}

impl From<GatewayError> for OrderFlowError {
    fn from(e: GatewayError) -> Self {
        Self::GatewayError { reason: e.reason, message: e.provider_message }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<OrderStoreError> for AccountApiError {
    fn from(e: OrderStoreError) -> Self {
        Self::DatabaseError(e.to_string())
    }
}
