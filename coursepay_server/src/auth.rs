//! Access token verification.
//!
//! Tokens are issued by the account service and signed with HS256 using the secret in `CPS_JWT_SECRET`. This server
//! only verifies them. Handlers that take a [`JwtClaims`] argument reject requests without a valid
//! `Authorization: Bearer <token>` header with a 401.
use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The user id.
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Expiry, in seconds since the unix epoch.
    pub exp: i64,
}

pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        Self { key, validation }
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.key, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                    AuthError::PoorlyFormattedToken(e.to_string())
                },
                _ => AuthError::ValidationError(e.to_string()),
            }
        })?;
        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::ValidationError("Token has no subject".into()));
        }
        Ok(data.claims)
    }
}

/// Signs tokens with the shared secret. The server never hands out tokens; this exists for tooling and tests.
pub fn issue_token(claims: &JwtClaims, config: &AuthConfig) -> Result<String, AuthError> {
    let key = EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &key).map_err(|e| AuthError::ValidationError(e.to_string()))
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let header = req.headers().get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;
    Ok(token)
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<TokenVerifier>>() {
            None => {
                error!("💻️ No token verifier has been registered with the app");
                Err(ServerError::ConfigurationError("Access tokens cannot be verified".into()))
            },
            Some(verifier) => bearer_token(req).and_then(|token| verifier.verify(token)).map_err(|e| {
                debug!("💻️ Rejected request to {}. {e}", req.path());
                ServerError::AuthenticationError(e)
            }),
        };
        ready(result)
    }
}
