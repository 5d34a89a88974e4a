use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use coursepay_engine::{AccountApiError, OrderFlowError};
use log::{error, info};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("{0}")]
    OrderFlow(#[from] OrderFlowError),
}

impl ServerError {
    /// The stable, machine-readable error code that is sent to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequestBody(_) => "invalid_request",
            Self::AuthenticationError(_) => "unauthorized",
            Self::ConfigurationError(_) => "configuration_error",
            Self::OrderFlow(e) => e.kind(),
            Self::InitializeError(_) | Self::BackendError(_) | Self::IOError(_) | Self::Unspecified(_) => {
                "internal_error"
            },
        }
    }

    /// The message that is sent to clients. Internal failure details only go to the log.
    fn public_message(&self) -> String {
        match self {
            Self::OrderFlow(OrderFlowError::DatabaseError(_)) |
            Self::OrderFlow(OrderFlowError::ConfigurationError(_)) |
            Self::ConfigurationError(_) |
            Self::InitializeError(_) |
            Self::BackendError(_) |
            Self::IOError(_) |
            Self::Unspecified(_) => "An internal error occurred. Please try again later.".to_string(),
            Self::AuthenticationError(_) => "Invalid or missing token".to_string(),
            _ => self.to_string(),
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::OrderFlow(e) => match e {
                OrderFlowError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                OrderFlowError::NotFound(_) => StatusCode::NOT_FOUND,
                OrderFlowError::Conflict(_) => StatusCode::CONFLICT,
                OrderFlowError::Forbidden(_) => StatusCode::FORBIDDEN,
                OrderFlowError::InvalidState(_) => StatusCode::BAD_REQUEST,
                OrderFlowError::GatewayError { .. } => StatusCode::BAD_GATEWAY,
                OrderFlowError::VerificationFailed => StatusCode::BAD_REQUEST,
                OrderFlowError::InvalidSignature => StatusCode::BAD_REQUEST,
                OrderFlowError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                OrderFlowError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ Request failed. {self}");
        } else if let Self::AuthenticationError(e) = self {
            info!("💻️ Rejected unauthenticated request. {e}");
        }
        let mut body = json!({ "error": self.kind(), "message": self.public_message() });
        if let Self::OrderFlow(OrderFlowError::GatewayError { reason, .. }) = self {
            body["reason"] = json!(reason);
        }
        HttpResponse::build(status).insert_header(ContentType::json()).body(body.to_string())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No access token was provided.")]
    MissingToken,
    #[error("The access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("The access token is invalid. {0}")]
    ValidationError(String),
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}
