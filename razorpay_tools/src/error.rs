use thiserror::Error;

use crate::data_objects::ErrorResponse;

#[derive(Debug, Error)]
pub enum RazorpayApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not reach Razorpay: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {}", .description.as_deref().unwrap_or("No description"))]
    QueryError { status: u16, code: Option<String>, reason: Option<String>, description: Option<String> },
}

impl RazorpayApiError {
    /// Builds a `QueryError` from a non-2xx response body. Razorpay wraps failures as
    /// `{"error": {"code": ..., "description": ..., "reason": ...}}`, but a proxy or load balancer in between may
    /// return anything at all, in which case the raw body becomes the description.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(ErrorResponse { error }) => Self::QueryError {
                status,
                code: error.code,
                reason: error.reason.filter(|r| r != "NA"),
                description: error.description,
            },
            Err(_) => Self::QueryError {
                status,
                code: None,
                reason: None,
                description: Some(body.trim().to_string()).filter(|s| !s.is_empty()),
            },
        }
    }

    /// A short, machine-friendly classification of the failure.
    pub fn reason(&self) -> String {
        match self {
            Self::Initialization(_) => "client_initialization_failed".to_string(),
            Self::RestResponseError(_) => "gateway_unreachable".to_string(),
            Self::JsonError(_) => "unexpected_response".to_string(),
            Self::QueryError { reason: Some(r), .. } => r.clone(),
            Self::QueryError { code: Some(c), .. } => c.to_lowercase(),
            Self::QueryError { status, .. } => format!("http_{status}"),
        }
    }

    /// The human-readable message supplied by the provider, if it gave one.
    pub fn provider_message(&self) -> Option<String> {
        match self {
            Self::QueryError { description, .. } => description.clone(),
            _ => None,
        }
    }
}
